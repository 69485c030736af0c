//! Folder materialization errors.

use std::fmt;

use thiserror::Error;

use crate::storage::StorageError;

/// Which step of materialization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderErrorReason {
    /// Looking up an existing folder failed.
    LookupFailed,
    /// Creating a missing folder failed.
    CreateFailed,
}

impl FolderErrorReason {
    /// Stable identifier for logs and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LookupFailed => "lookup_failed",
            Self::CreateFailed => "create_failed",
        }
    }
}

impl fmt::Display for FolderErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Materialization failure at one path segment.
///
/// Folders created for earlier segments are left in place.
#[derive(Debug, Error)]
#[error("{reason} for folder '{segment}' at segment {at_segment}: {source}")]
pub struct FolderError {
    /// Failed step.
    pub reason: FolderErrorReason,
    /// Index of the failing segment.
    pub at_segment: usize,
    /// Name of the failing segment.
    pub segment: String,
    /// Storage failure.
    #[source]
    pub source: StorageError,
}

impl FolderError {
    /// Lookup of `segment` failed.
    #[must_use]
    pub fn lookup_failed(at_segment: usize, segment: impl Into<String>, source: StorageError) -> Self {
        Self {
            reason: FolderErrorReason::LookupFailed,
            at_segment,
            segment: segment.into(),
            source,
        }
    }

    /// Creation of `segment` failed.
    #[must_use]
    pub fn create_failed(at_segment: usize, segment: impl Into<String>, source: StorageError) -> Self {
        Self {
            reason: FolderErrorReason::CreateFailed,
            at_segment,
            segment: segment.into(),
            source,
        }
    }
}
