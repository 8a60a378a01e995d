use serde::{Deserialize, Serialize};

pub const TRIGGERED_MESSAGE: &str = "Configuration update process initiated";
pub const RATE_LIMITED_MESSAGE: &str = "Too many triggers";

/// JSON body returned by the webhook endpoint, tagged by `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum WebhookResponse {
    /// The script ran; a non-zero `exit_code` is still reported here
    Triggered {
        delivery_id: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        message: String,
    },

    Ignored {
        reason: String,
    },

    RateLimited {
        message: String,
    },

    Error {
        message: String,
    },
}

impl WebhookResponse {
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored {
            reason: reason.into(),
        }
    }

    pub fn rate_limited() -> Self {
        Self::RateLimited {
            message: RATE_LIMITED_MESSAGE.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_triggered_shape() {
        let response = WebhookResponse::Triggered {
            delivery_id: "abc".to_string(),
            exit_code: Some(2),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            message: TRIGGERED_MESSAGE.to_string(),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "triggered",
                "deliveryId": "abc",
                "exitCode": 2,
                "stdout": "out",
                "stderr": "err",
                "message": "Configuration update process initiated"
            })
        );
    }

    #[test]
    fn test_status_tags() {
        let value = serde_json::to_value(WebhookResponse::ignored("Not a push event: ping")).unwrap();
        assert_eq!(value, json!({"status": "ignored", "reason": "Not a push event: ping"}));

        let value = serde_json::to_value(WebhookResponse::rate_limited()).unwrap();
        assert_eq!(value, json!({"status": "rate_limited", "message": "Too many triggers"}));

        let value = serde_json::to_value(WebhookResponse::error("boom")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "boom"}));
    }
}
