use crate::error::{GithubError, GithubResult};
use axum::http::header::HeaderMap;
use hmac::{Hmac, Mac};
use restorehook_core::WebhookHeaders;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Event name header, e.g. `push` or `ping`
pub const EVENT_HEADER: &str = "x-github-event";

/// Unique id GitHub assigns to each delivery
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// HMAC-SHA256 of the body, sent as `sha256=<hex>`
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Webhook secret for HMAC verification
#[derive(Clone, Debug)]
pub struct WebhookSecret(Arc<SecretString>);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(Arc::new(SecretString::from(secret)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Read the event and delivery headers without touching the body
///
/// Headers that are not valid UTF-8 are treated as missing.
pub fn webhook_headers(headers: &HeaderMap) -> WebhookHeaders<'_> {
    WebhookHeaders {
        event_type: header_str(headers, EVENT_HEADER),
        delivery_id: header_str(headers, DELIVERY_HEADER),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Check the `X-Hub-Signature-256` header against the raw body
pub fn verify_request(headers: &HeaderMap, body: &[u8], secret: &WebhookSecret) -> GithubResult<()> {
    let signature = extract_signature(headers)?;
    verify_signature(body, &signature, secret.expose())
}

/// Extract signature from X-Hub-Signature-256 header
fn extract_signature(headers: &HeaderMap) -> GithubResult<Vec<u8>> {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .ok_or_else(|| GithubError::MissingHeader("X-Hub-Signature-256".to_string()))?
        .to_str()
        .map_err(|e| GithubError::InvalidSignatureFormat(format!("Invalid header encoding: {}", e)))?;

    let signature_hex = signature_header.strip_prefix("sha256=").ok_or_else(|| {
        GithubError::InvalidSignatureFormat("Signature must start with 'sha256='".to_string())
    })?;

    hex::decode(signature_hex)
        .map_err(|e| GithubError::InvalidSignatureFormat(format!("Invalid hex encoding: {}", e)))
}

/// Verify HMAC-SHA256 signature using constant-time comparison
fn verify_signature(body: &[u8], signature: &[u8], secret: &str) -> GithubResult<()> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
        GithubError::HmacVerificationFailed(format!("HMAC initialization failed: {}", e))
    })?;

    mac.update(body);
    let expected = mac.finalize().into_bytes();

    if expected.ct_eq(signature).into() {
        Ok(())
    } else {
        Err(GithubError::HmacVerificationFailed(
            "Signature mismatch".to_string(),
        ))
    }
}
