//! Storage error types.

use google_drive3 as drive3;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The request never produced a response.
    #[error("storage request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("storage API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response did not match the expected shape.
    #[error("unexpected storage API response: {0}")]
    Decode(String),

    /// Client construction failed.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<drive3::Error> for StorageError {
    fn from(err: drive3::Error) -> Self {
        match err {
            // Error statuses with a JSON body, e.g. {"error": {"code": 404, ...}}
            drive3::Error::BadRequest(body) => {
                let status = body
                    .pointer("/error/code")
                    .and_then(serde_json::Value::as_u64)
                    .and_then(|code| u16::try_from(code).ok())
                    .unwrap_or(400);
                Self::status(status, body.to_string())
            }
            drive3::Error::Failure(response) => {
                let status = response.status();
                Self::status(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default(),
                )
            }
            drive3::Error::JsonDecodeError(body, e) => Self::Decode(format!("{e}: {body}")),
            other => Self::Transport(other.to_string()),
        }
    }
}
