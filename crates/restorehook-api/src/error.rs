use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use restorehook_core::CoreError;
use restorehook_github::GithubError;
use restorehook_trigger::TriggerError;
use thiserror::Error;

use crate::response::WebhookResponse;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Event type or delivery id header missing (400)
    #[error("Missing GitHub headers")]
    MissingHeaders,

    /// Signature header missing or wrong (401)
    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] GithubError),

    /// Push body could not be parsed (500)
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Restore script could not be started (500)
    #[error(transparent)]
    Trigger(#[from] TriggerError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingHeaders => StatusCode::BAD_REQUEST,
            ApiError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPayload(_) | ApiError::Trigger(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // GitHub treats this as a client mistake; plain text like the 404
            ApiError::MissingHeaders => (status, "Invalid request").into_response(),
            other => (status, Json(WebhookResponse::error(other.to_string()))).into_response(),
        }
    }
}

// Conversions from domain errors to ApiError
impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MalformedPayload(msg) => ApiError::InvalidPayload(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
