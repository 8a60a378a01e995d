use restorehook_core::{RateLimiter, RequestValidator};
use restorehook_github::WebhookSecret;
use restorehook_trigger::Trigger;
use std::sync::Arc;

/// Application state for Axum dependency injection
///
/// The rate limiter is the only mutable state shared between requests.
#[derive(Clone)]
pub struct AppState {
    /// Event and branch filter
    pub validator: Arc<RequestValidator>,

    /// Fixed-window limiter shared by all requests
    pub rate_limiter: Arc<RateLimiter>,

    /// Restore action run for accepted pushes
    pub trigger: Arc<dyn Trigger>,

    /// When set, deliveries must carry a valid `X-Hub-Signature-256`
    pub webhook_secret: Option<WebhookSecret>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        validator: RequestValidator,
        rate_limiter: RateLimiter,
        trigger: Arc<dyn Trigger>,
        webhook_secret: Option<WebhookSecret>,
    ) -> Self {
        Self {
            validator: Arc::new(validator),
            rate_limiter: Arc::new(rate_limiter),
            trigger,
            webhook_secret,
        }
    }
}
