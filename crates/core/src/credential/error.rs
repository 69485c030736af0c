//! Authentication error types.

use std::fmt;

use thiserror::Error;

/// Why a session could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorReason {
    /// No credential configured.
    MissingSecret,
    /// The credential could not be decoded or parsed.
    DecodeFailure,
    /// The token endpoint refused or could not be reached.
    ProviderRejected,
}

impl AuthErrorReason {
    /// Stable identifier for logs and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSecret => "missing_secret",
            Self::DecodeFailure => "decode_failure",
            Self::ProviderRejected => "provider_rejected",
        }
    }
}

impl fmt::Display for AuthErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session acquisition failure.
#[derive(Debug, Error)]
#[error("{reason}: {message}")]
pub struct AuthError {
    /// Failure category.
    pub reason: AuthErrorReason,
    /// Underlying cause.
    pub message: String,
}

impl AuthError {
    /// No credential configured.
    #[must_use]
    pub fn missing_secret() -> Self {
        Self {
            reason: AuthErrorReason::MissingSecret,
            message: "service account key is missing".to_string(),
        }
    }

    /// Credential could not be decoded.
    #[must_use]
    pub fn decode_failure(msg: impl Into<String>) -> Self {
        Self {
            reason: AuthErrorReason::DecodeFailure,
            message: msg.into(),
        }
    }

    /// Token endpoint rejected the assertion.
    #[must_use]
    pub fn provider_rejected(msg: impl Into<String>) -> Self {
        Self {
            reason: AuthErrorReason::ProviderRejected,
            message: msg.into(),
        }
    }
}
