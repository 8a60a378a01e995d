pub mod error;
pub mod health;
pub mod response;
pub mod routes;
pub mod state;
pub mod webhook_handler;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use health::{HealthResponse, health};
pub use response::WebhookResponse;
pub use routes::{not_found, router};
pub use state::AppState;
pub use webhook_handler::handle_webhook;
