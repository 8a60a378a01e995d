mod config;

use crate::config::AppConfig;
use restorehook_api::{AppState, router};
use restorehook_core::{RateLimiter, RequestValidator};
use restorehook_github::WebhookSecret;
use restorehook_trigger::ScriptTrigger;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully");

    let trigger = ScriptTrigger::from_config(&config.trigger);
    if !config.trigger.script_path.exists() {
        warn!(
            "Trigger script {} does not exist; accepted pushes will fail until it is installed",
            config.trigger.script_path.display()
        );
    }

    let webhook_secret = config.webhook.secret.clone().map(WebhookSecret::new);
    if webhook_secret.is_none() {
        warn!("No webhook secret configured; deliveries are not authenticated");
    }

    let rate_limiter = RateLimiter::new(&config.rate_limit);
    info!(
        "Rate limit: {} triggers per {} ms",
        rate_limiter.max_per_window(),
        config.rate_limit.window_ms
    );

    // Create application state
    let app_state = AppState::new(
        RequestValidator::new(config.webhook.target_ref.clone()),
        rate_limiter,
        Arc::new(trigger),
        webhook_secret,
    );

    let app = router(app_state);

    // Start server
    let addr = (config.server.host.as_str(), config.server.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(
                "Failed to bind to {}:{}: {}",
                config.server.host, config.server.port, e
            );
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(local) => info!("Webhook receiver listening on {}", local),
        Err(_) => info!("Webhook receiver listening on port {}", config.server.port),
    }
    info!("Endpoints:");
    info!("  POST /webhook - Trigger configuration restore");
    info!("  GET  /health  - Health check");
    info!(
        "Triggering {} on pushes to {}",
        config.trigger.script_path.display(),
        config.webhook.target_ref
    );

    // Run server with graceful shutdown
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
