use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::MalformedPayload(e.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
