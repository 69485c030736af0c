//! Upload error types.

use std::fmt;

use thiserror::Error;

use stowage_shared::AppError;

use crate::credential::AuthError;
use crate::folder::{FolderError, FolderPathError};
use crate::storage::StorageError;

/// Which stage of an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorReason {
    /// Caller input is missing or invalid.
    ValidationFailed,
    /// No session could be obtained.
    AuthFailed,
    /// The destination folder could not be materialized.
    FolderResolutionFailed,
    /// The content upload failed.
    TransferFailed,
}

impl UploadErrorReason {
    /// Stable identifier for logs and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::AuthFailed => "auth_failed",
            Self::FolderResolutionFailed => "folder_resolution_failed",
            Self::TransferFailed => "transfer_failed",
        }
    }
}

impl fmt::Display for UploadErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload failure. The message carries the underlying cause.
#[derive(Debug, Error)]
#[error("{reason}: {message}")]
pub struct UploadError {
    /// Failed stage.
    pub reason: UploadErrorReason,
    /// Human-readable cause.
    pub message: String,
}

impl UploadError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            reason: UploadErrorReason::ValidationFailed,
            message: msg.into(),
        }
    }
}

impl From<FolderPathError> for UploadError {
    fn from(err: FolderPathError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<AuthError> for UploadError {
    fn from(err: AuthError) -> Self {
        Self {
            reason: UploadErrorReason::AuthFailed,
            message: err.to_string(),
        }
    }
}

impl From<FolderError> for UploadError {
    fn from(err: FolderError) -> Self {
        Self {
            reason: UploadErrorReason::FolderResolutionFailed,
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        Self {
            reason: UploadErrorReason::TransferFailed,
            message: err.to_string(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err.reason {
            UploadErrorReason::ValidationFailed => Self::Validation(err.message),
            UploadErrorReason::AuthFailed => Self::Authentication(err.message),
            UploadErrorReason::FolderResolutionFailed | UploadErrorReason::TransferFailed => {
                Self::ExternalService(err.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_conversion() {
        let err: UploadError = AuthError::missing_secret().into();
        assert_eq!(err.reason, UploadErrorReason::AuthFailed);
        assert_eq!(err.message, "missing_secret: service account key is missing");
    }

    #[test]
    fn test_storage_error_is_transfer_failure() {
        let err: UploadError = StorageError::status(500, "backend down").into();
        assert_eq!(err.reason, UploadErrorReason::TransferFailed);
        assert!(err.message.contains("backend down"));
    }

    #[test]
    fn test_app_error_mapping() {
        assert_eq!(
            AppError::from(UploadError::validation("bad")).status_code(),
            400
        );
        let auth: UploadError = AuthError::provider_rejected("nope").into();
        assert_eq!(AppError::from(auth).status_code(), 500);
        let transfer: UploadError = StorageError::decode("shape").into();
        let app = AppError::from(transfer);
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}
