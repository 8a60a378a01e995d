use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The part of a GitHub `push` payload the receiver cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    /// Full ref that was pushed, e.g. `refs/heads/main`.
    /// A missing or non-string `ref` is read as `None`.
    #[serde(rename = "ref", default, deserialize_with = "string_or_none")]
    pub git_ref: Option<String>,
}

impl PushPayload {
    /// Parse a raw request body
    ///
    /// Invalid JSON and a bare `null` are errors. Any other JSON value that is
    /// not an object (array, string, number, bool) has no `ref` and parses to
    /// an empty payload.
    pub fn parse(body: &[u8]) -> CoreResult<Self> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Null => Err(CoreError::MalformedPayload(
                "payload is null".to_string(),
            )),
            value @ Value::Object(_) => Ok(Self::deserialize(value)?),
            _ => Ok(Self::default()),
        }
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
