pub mod config;
pub mod error;
pub mod payload;
pub mod rate_limit;
pub mod validation;

// Re-export commonly used types
pub use config::{RateLimitConfig, ServerConfig, TriggerConfig, WebhookConfig};
pub use error::{CoreError, CoreResult};
pub use payload::PushPayload;
pub use rate_limit::RateLimiter;
pub use validation::{
    HeaderScreen, IncomingWebhook, RequestValidator, ValidationOutcome, WebhookHeaders,
};
