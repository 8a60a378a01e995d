use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use restorehook_core::config::{
    DEFAULT_HOST, DEFAULT_INTERPRETER, DEFAULT_MAX_PER_WINDOW, DEFAULT_PORT, DEFAULT_SCRIPT_PATH,
    DEFAULT_TARGET_REF, DEFAULT_WINDOW_MS,
};
use restorehook_core::{RateLimitConfig, ServerConfig, TriggerConfig, WebhookConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub trigger: TriggerConfig,
    pub rate_limit: RateLimitConfig,
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config.toml file (if present)
    /// 3. Environment variables (prefixed with RESTOREHOOK_)
    ///
    /// Environment variables use double underscore for nesting:
    /// - RESTOREHOOK_SERVER__PORT=9000
    /// - RESTOREHOOK_TRIGGER__SCRIPT_PATH=/usr/local/bin/restore.sh
    /// - RESTOREHOOK_TRIGGER__INTERPRETER= (empty: execute the script directly)
    /// - RESTOREHOOK_RATE_LIMIT__MAX_PER_WINDOW=5
    pub fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?;

        // Try to load config.toml if it exists
        let builder = if Path::new("config.toml").exists() {
            builder.add_source(File::with_name("config"))
        } else {
            builder
        };

        // Override with environment variables
        let builder = builder.add_source(
            Environment::with_prefix("RESTOREHOOK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config
            .webhook
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("trigger.script_path", DEFAULT_SCRIPT_PATH)?
        .set_default("trigger.interpreter", DEFAULT_INTERPRETER)?
        .set_default("rate_limit.window_ms", DEFAULT_WINDOW_MS as i64)?
        .set_default("rate_limit.max_per_window", i64::from(DEFAULT_MAX_PER_WINDOW))?
        .set_default("webhook.target_ref", DEFAULT_TARGET_REF)
}
