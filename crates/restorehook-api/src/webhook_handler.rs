use crate::{
    error::{ApiError, ApiResult},
    response::{TRIGGERED_MESSAGE, WebhookResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use restorehook_core::{HeaderScreen, ValidationOutcome};
use restorehook_github::{verify_request, webhook_headers};
use std::sync::Arc;
use tracing::{error, info, warn};

/// GitHub caps webhook payloads at 25 MB
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Webhook handler for GitHub push events
///
/// This handler:
/// 1. Rejects deliveries without event/delivery headers (400)
/// 2. Ignores non-push events (200) without reading the body
/// 3. Verifies the HMAC signature when a secret is configured (401)
/// 4. Ignores pushes to other refs (200)
/// 5. Takes a rate-limit slot (429 when none is left)
/// 6. Runs the restore script and reports its exit code (200), or 500 if it
///    could not be started
pub async fn handle_webhook(State(state): State<AppState>, req: Request) -> ApiResult<Response> {
    let (parts, body) = req.into_parts();

    let headers = webhook_headers(&parts.headers);
    info!(
        "Webhook received (event: {}, delivery: {})",
        headers.event_type.unwrap_or("-"),
        headers.delivery_id.unwrap_or("-")
    );

    let outcome = match state.validator.screen_headers(&headers) {
        HeaderScreen::Settled(outcome) => outcome,
        HeaderScreen::NeedsBody => {
            let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
                .await
                .map_err(|e| ApiError::Internal(format!("Failed to read request body: {}", e)))?;

            if let Some(secret) = &state.webhook_secret {
                if let Err(e) = verify_request(&parts.headers, &body, secret) {
                    warn!("Rejected: {}", e);
                    return Err(e.into());
                }
            }

            state.validator.classify_body(&body).map_err(|e| {
                error!("Failed to parse push payload: {}", e);
                ApiError::from(e)
            })?
        }
    };

    match outcome {
        ValidationOutcome::MissingHeaders => {
            warn!("Rejected: missing GitHub headers");
            Err(ApiError::MissingHeaders)
        }
        ValidationOutcome::IgnoredEvent { event_type } => {
            info!("Ignored: {} event", event_type);
            Ok(ignored(format!("Not a push event: {}", event_type)))
        }
        ValidationOutcome::IgnoredRef { git_ref } => {
            let git_ref = git_ref.as_deref().unwrap_or("<missing>");
            info!("Ignored: push to {}", git_ref);
            Ok(ignored(format!("Not target branch: {}", git_ref)))
        }
        ValidationOutcome::Accepted => {
            let delivery_id = headers.delivery_id.unwrap_or_default().to_string();
            run_trigger(&state, delivery_id).await
        }
    }
}

fn ignored(reason: String) -> Response {
    (StatusCode::OK, Json(WebhookResponse::ignored(reason))).into_response()
}

/// Take a rate-limit slot, then run the restore script once
async fn run_trigger(state: &AppState, delivery_id: String) -> ApiResult<Response> {
    if !state.rate_limiter.try_acquire() {
        info!(
            "Rate limited: more than {} triggers within {:?}",
            state.rate_limiter.max_per_window(),
            state.rate_limiter.window()
        );
        return Ok((
            StatusCode::TOO_MANY_REQUESTS,
            Json(WebhookResponse::rate_limited()),
        )
            .into_response());
    }

    info!(
        "Valid push to {} - triggering restore ({})",
        state.validator.target_ref(),
        state.trigger.describe()
    );

    // Owned by its own task: a client that hangs up does not cancel the script.
    let trigger = Arc::clone(&state.trigger);
    let output = tokio::spawn(async move { trigger.run().await })
        .await
        .map_err(|e| {
            error!("Trigger task failed: {}", e);
            ApiError::Internal(format!("Trigger task failed: {}", e))
        })?
        .map_err(|e| {
            error!("Error executing trigger script: {}", e);
            ApiError::from(e)
        })?;

    match output.exit_code {
        Some(code) => info!("Trigger script exit code: {}", code),
        None => warn!("Trigger script terminated by signal"),
    }
    if !output.stdout.is_empty() {
        info!("Trigger script stdout: {}", output.stdout.trim_end());
    }
    if !output.stderr.is_empty() {
        warn!("Trigger script stderr: {}", output.stderr.trim_end());
    }

    let response = WebhookResponse::Triggered {
        delivery_id,
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
        message: TRIGGERED_MESSAGE.to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
