use crate::error::CoreResult;
use crate::payload::PushPayload;

/// The only event type that can trigger the restore script
pub const PUSH_EVENT: &str = "push";

/// The GitHub headers the validator looks at
///
/// Values are `None` when absent or not valid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookHeaders<'a> {
    pub event_type: Option<&'a str>,
    pub delivery_id: Option<&'a str>,
}

impl WebhookHeaders<'_> {
    /// Both required headers are present and non-empty
    pub fn has_required_headers(&self) -> bool {
        is_present(self.event_type) && is_present(self.delivery_id)
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// A complete webhook delivery: headers plus raw body
#[derive(Debug, Clone, Copy)]
pub struct IncomingWebhook<'a> {
    pub headers: WebhookHeaders<'a>,
    pub body: &'a [u8],
}

/// Classification of a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Event type or delivery id header missing or empty
    MissingHeaders,

    /// Not a push event
    IgnoredEvent { event_type: String },

    /// A push, but not to the target ref
    IgnoredRef { git_ref: Option<String> },

    /// Push to the target ref; may trigger the script
    Accepted,
}

/// Result of looking at the headers alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderScreen {
    /// Final outcome; the body is never needed
    Settled(ValidationOutcome),

    /// A push event; the body decides
    NeedsBody,
}

/// Classifies deliveries against the configured target ref
#[derive(Debug, Clone)]
pub struct RequestValidator {
    target_ref: String,
}

impl RequestValidator {
    pub fn new(target_ref: impl Into<String>) -> Self {
        Self {
            target_ref: target_ref.into(),
        }
    }

    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Header stage: required headers, then the event filter
    pub fn screen_headers(&self, headers: &WebhookHeaders<'_>) -> HeaderScreen {
        if !headers.has_required_headers() {
            return HeaderScreen::Settled(ValidationOutcome::MissingHeaders);
        }

        let event_type = headers.event_type.unwrap_or_default();
        if event_type != PUSH_EVENT {
            return HeaderScreen::Settled(ValidationOutcome::IgnoredEvent {
                event_type: event_type.to_string(),
            });
        }

        HeaderScreen::NeedsBody
    }

    /// Body stage for push events: compare the payload `ref` to the target
    ///
    /// Only yields `IgnoredRef` or `Accepted`. A body that cannot be parsed is
    /// an error rather than an outcome.
    pub fn classify_body(&self, body: &[u8]) -> CoreResult<ValidationOutcome> {
        let payload = PushPayload::parse(body)?;
        if payload.git_ref.as_deref() != Some(self.target_ref.as_str()) {
            return Ok(ValidationOutcome::IgnoredRef {
                git_ref: payload.git_ref,
            });
        }

        Ok(ValidationOutcome::Accepted)
    }

    /// Classify a whole delivery; headers are checked before the body is touched
    pub fn classify(&self, webhook: &IncomingWebhook<'_>) -> CoreResult<ValidationOutcome> {
        match self.screen_headers(&webhook.headers) {
            HeaderScreen::Settled(outcome) => Ok(outcome),
            HeaderScreen::NeedsBody => self.classify_body(webhook.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    const MAIN_PUSH: &[u8] = br#"{"ref":"refs/heads/main"}"#;

    fn webhook<'a>(
        event_type: Option<&'a str>,
        delivery_id: Option<&'a str>,
        body: &'a [u8],
    ) -> IncomingWebhook<'a> {
        IncomingWebhook {
            headers: WebhookHeaders {
                event_type,
                delivery_id,
            },
            body,
        }
    }

    fn validator() -> RequestValidator {
        RequestValidator::new("refs/heads/main")
    }

    #[test]
    fn test_missing_headers() {
        let v = validator();
        for (event, delivery) in [
            (None, Some("abc")),
            (Some("push"), None),
            (None, None),
            (Some(""), Some("abc")),
            (Some("push"), Some("")),
        ] {
            let outcome = v.classify(&webhook(event, delivery, MAIN_PUSH)).unwrap();
            assert_eq!(outcome, ValidationOutcome::MissingHeaders);
        }
    }

    #[test]
    fn test_missing_headers_checked_before_body() {
        let outcome = validator()
            .classify(&webhook(Some("push"), None, b"{not json"))
            .unwrap();
        assert_eq!(outcome, ValidationOutcome::MissingHeaders);
    }

    #[test]
    fn test_non_push_event_ignored_without_parsing() {
        let outcome = validator()
            .classify(&webhook(Some("ping"), Some("abc"), b"{not json"))
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::IgnoredEvent {
                event_type: "ping".to_string()
            }
        );
    }

    #[test]
    fn test_event_match_is_exact() {
        let outcome = validator()
            .classify(&webhook(Some("Push"), Some("abc"), MAIN_PUSH))
            .unwrap();
        assert!(matches!(outcome, ValidationOutcome::IgnoredEvent { .. }));
    }

    #[test]
    fn test_screen_headers() {
        let v = validator();

        let missing = WebhookHeaders {
            event_type: Some("push"),
            delivery_id: None,
        };
        assert_eq!(
            v.screen_headers(&missing),
            HeaderScreen::Settled(ValidationOutcome::MissingHeaders)
        );

        let ping = WebhookHeaders {
            event_type: Some("ping"),
            delivery_id: Some("abc"),
        };
        assert_eq!(
            v.screen_headers(&ping),
            HeaderScreen::Settled(ValidationOutcome::IgnoredEvent {
                event_type: "ping".to_string()
            })
        );

        let push = WebhookHeaders {
            event_type: Some("push"),
            delivery_id: Some("abc"),
        };
        assert_eq!(v.screen_headers(&push), HeaderScreen::NeedsBody);
    }

    #[test]
    fn test_classify_body() {
        let v = validator();
        assert_eq!(v.classify_body(MAIN_PUSH).unwrap(), ValidationOutcome::Accepted);
        assert_eq!(
            v.classify_body(b"[]").unwrap(),
            ValidationOutcome::IgnoredRef { git_ref: None }
        );
        assert!(v.classify_body(b"null").is_err());
    }

    #[test]
    fn test_malformed_push_body_is_error() {
        let result = validator().classify(&webhook(Some("push"), Some("abc"), b"{not json"));
        assert!(matches!(result, Err(CoreError::MalformedPayload(_))));
    }

    #[test]
    fn test_other_branch_ignored() {
        let outcome = validator()
            .classify(&webhook(
                Some("push"),
                Some("abc"),
                br#"{"ref":"refs/heads/feature"}"#,
            ))
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::IgnoredRef {
                git_ref: Some("refs/heads/feature".to_string())
            }
        );
    }

    #[test]
    fn test_ref_match_is_exact() {
        let v = validator();
        let bodies: [&[u8]; 3] = [
            br#"{"ref":"refs/heads/main2"}"#,
            br#"{"ref":"main"}"#,
            br#"{"ref":"refs/tags/main"}"#,
        ];
        for body in bodies {
            let outcome = v.classify(&webhook(Some("push"), Some("abc"), body)).unwrap();
            assert!(matches!(outcome, ValidationOutcome::IgnoredRef { .. }));
        }
    }

    #[test]
    fn test_missing_ref_ignored() {
        let outcome = validator()
            .classify(&webhook(Some("push"), Some("abc"), b"{}"))
            .unwrap();
        assert_eq!(outcome, ValidationOutcome::IgnoredRef { git_ref: None });
    }

    #[test]
    fn test_accepted() {
        let outcome = validator()
            .classify(&webhook(Some("push"), Some("abc"), MAIN_PUSH))
            .unwrap();
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn test_custom_target_ref() {
        let v = RequestValidator::new("refs/heads/release");
        assert_eq!(v.target_ref(), "refs/heads/release");

        let outcome = v.classify(&webhook(Some("push"), Some("abc"), MAIN_PUSH)).unwrap();
        assert!(matches!(outcome, ValidationOutcome::IgnoredRef { .. }));

        let outcome = v
            .classify(&webhook(
                Some("push"),
                Some("abc"),
                br#"{"ref":"refs/heads/release"}"#,
            ))
            .unwrap();
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }
}
