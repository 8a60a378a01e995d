pub mod error;
pub mod webhook;

// Re-export commonly used types
pub use error::{GithubError, GithubResult};
pub use webhook::{
    DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER, WebhookSecret, verify_request,
    webhook_headers,
};
