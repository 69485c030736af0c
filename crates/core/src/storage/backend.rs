//! Storage backend contract and the values it exchanges.

use std::fmt;
use std::future::Future;

use bytes::Bytes;

use super::error::StorageError;

/// MIME type Drive uses to mark folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Opaque identifier the storage API assigns to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderHandle(String);

impl FolderHandle {
    /// Wrap an identifier returned by the API or taken from configuration.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file to be uploaded into a folder.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Stored filename.
    pub name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// File content.
    pub content: Bytes,
}

/// An uploaded file as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// External file identifier.
    pub id: String,
    /// Shareable link.
    pub link: String,
}

/// Operations the service needs from the storage API.
///
/// `find_folder` is safe to repeat. `create_folder` is not idempotent: the API
/// accepts duplicate names under one parent, so callers look up before creating.
pub trait StorageBackend: Send + Sync {
    /// List non-trashed folders named `name` directly under `parent`, in API order.
    fn find_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> impl Future<Output = Result<Vec<FolderHandle>, StorageError>> + Send;

    /// Create a folder named `name` under `parent`.
    fn create_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> impl Future<Output = Result<FolderHandle, StorageError>> + Send;

    /// Upload `file` under `parent` and return its id and shareable link.
    fn upload_file(
        &self,
        parent: &FolderHandle,
        file: NewFile,
    ) -> impl Future<Output = Result<StoredFile, StorageError>> + Send;
}
