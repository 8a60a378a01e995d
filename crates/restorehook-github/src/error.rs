use thiserror::Error;

/// GitHub crate error types
#[derive(Debug, Error, PartialEq)]
pub enum GithubError {
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("HMAC verification failed: {0}")]
    HmacVerificationFailed(String),
}

pub type GithubResult<T> = Result<T, GithubError>;
