//! Error taxonomy of the REST boundary

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`super::ApiClientTrait`] calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response; the body is kept as parsed JSON (`null` if unparsable)
    #[error("Request failed with status {status}")]
    Status { status: u16, body: Value },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Human-readable message for a slice error, if the failure carries one.
    ///
    /// Status errors yield the body's `message`, then `detail`; `None` lets
    /// the slice apply its fallback.
    pub fn message(&self) -> Option<String> {
        match self {
            ApiError::Network(e) => Some(e.to_string()),
            ApiError::Decode(msg) => Some(msg.clone()),
            ApiError::Status { body, .. } => ["message", "detail"]
                .iter()
                .find_map(|key| body.get(key).and_then(Value::as_str))
                .filter(|msg| !msg.is_empty())
                .map(str::to_string),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
