use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "::";
pub const DEFAULT_PORT: u16 = 23614;
pub const DEFAULT_SCRIPT_PATH: &str = "/opt/declare-sh/trigger-restore.sh";
pub const DEFAULT_INTERPRETER: &str = "bash";
pub const DEFAULT_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_MAX_PER_WINDOW: u32 = 3;
pub const DEFAULT_TARGET_REF: &str = "refs/heads/main";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// External restore script configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Script launched for every accepted push
    pub script_path: PathBuf,

    /// Program used to run the script, `bash` by default.
    /// Unset or empty means the script is executed directly.
    pub interpreter: Option<String>,
}

impl TriggerConfig {
    /// The interpreter to launch, if any
    pub fn interpreter(&self) -> Option<&str> {
        self.interpreter.as_deref().filter(|i| !i.trim().is_empty())
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
        }
    }
}

/// Fixed-window rate limit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds
    pub window_ms: u64,

    /// Triggers granted per window
    pub max_per_window: u32,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_per_window: DEFAULT_MAX_PER_WINDOW,
        }
    }
}

/// Webhook filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Only pushes whose `ref` equals this value trigger the script
    pub target_ref: String,

    /// Shared secret for `X-Hub-Signature-256` verification
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            target_ref: DEFAULT_TARGET_REF.to_string(),
            secret: None,
        }
    }
}

impl WebhookConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.target_ref.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "webhook.target_ref must not be empty".to_string(),
            ));
        }
        if matches!(&self.secret, Some(secret) if secret.is_empty()) {
            return Err(CoreError::InvalidConfig(
                "webhook.secret must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }
}
