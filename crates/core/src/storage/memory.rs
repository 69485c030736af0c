//! In-process Drive emulation (development only).
//!
//! Keeps the folder tree in memory so the service can run without Google
//! credentials. A drive built with [`MemoryDrive::recording`] also keeps
//! every call and every uploaded file, so tests can assert exact call
//! sequences. Clones share state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::backend::{FolderHandle, NewFile, StorageBackend, StoredFile};
use super::error::StorageError;

/// One of the three backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveOperation {
    /// `find_folder`.
    FindFolder,
    /// `create_folder`.
    CreateFolder,
    /// `upload_file`.
    UploadFile,
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveCall {
    /// Folder lookup.
    FindFolder {
        /// Parent folder.
        parent: FolderHandle,
        /// Folder name.
        name: String,
    },
    /// Folder creation.
    CreateFolder {
        /// Parent folder.
        parent: FolderHandle,
        /// Folder name.
        name: String,
    },
    /// File upload.
    UploadFile {
        /// Destination folder.
        parent: FolderHandle,
        /// Stored filename.
        name: String,
        /// Content type.
        content_type: String,
    },
}

impl DriveCall {
    /// The operation this call performed.
    #[must_use]
    pub fn operation(&self) -> DriveOperation {
        match self {
            Self::FindFolder { .. } => DriveOperation::FindFolder,
            Self::CreateFolder { .. } => DriveOperation::CreateFolder,
            Self::UploadFile { .. } => DriveOperation::UploadFile,
        }
    }
}

/// A file held by [`MemoryDrive`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// File id.
    pub id: String,
    /// Containing folder.
    pub parent: FolderHandle,
    /// Filename.
    pub name: String,
    /// Content type.
    pub content_type: String,
    /// Content.
    pub content: Bytes,
}

#[derive(Debug)]
struct Folder {
    handle: FolderHandle,
    parent: FolderHandle,
    name: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    folders: Vec<Folder>,
    files: Vec<StoredObject>,
    calls: Vec<DriveCall>,
    failures: HashSet<(DriveOperation, String)>,
    sessions_issued: usize,
    rejected_sessions: Option<String>,
    recording: bool,
}

impl State {
    fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn check_failure(&self, operation: DriveOperation, name: &str) -> Result<(), StorageError> {
        if self.failures.contains(&(operation, name.to_string())) {
            return Err(StorageError::status(
                503,
                format!("injected {operation:?} failure for '{name}'"),
            ));
        }
        Ok(())
    }

    fn record(&mut self, call: DriveCall) {
        if self.recording {
            self.calls.push(call);
        }
    }
}

/// In-memory Drive.
#[derive(Debug, Clone, Default)]
pub struct MemoryDrive {
    state: Arc<Mutex<State>>,
}

impl MemoryDrive {
    /// Link prefix for stored files.
    pub const LINK_BASE: &'static str = "memory://drive/file";

    /// Create an empty drive. Calls and file content are not retained.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty drive that keeps its call history and uploaded files.
    #[must_use]
    pub fn recording() -> Self {
        let drive = Self::default();
        drive.lock().recording = true;
        drive
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a folder without recording a call. Duplicate names are allowed.
    pub fn insert_folder(&self, parent: &FolderHandle, name: &str) -> FolderHandle {
        let mut state = self.lock();
        let handle = FolderHandle::new(state.allocate_id("folder"));
        state.folders.push(Folder {
            handle: handle.clone(),
            parent: parent.clone(),
            name: name.to_string(),
        });
        handle
    }

    /// Make every `operation` on `name` (folder or file name) fail.
    pub fn fail_on(&self, operation: DriveOperation, name: &str) {
        self.lock().failures.insert((operation, name.to_string()));
    }

    /// Make session requests fail with `reason`.
    pub fn reject_sessions(&self, reason: impl Into<String>) {
        self.lock().rejected_sessions = Some(reason.into());
    }

    /// Reason set by [`MemoryDrive::reject_sessions`], if any.
    #[must_use]
    pub fn session_rejection(&self) -> Option<String> {
        self.lock().rejected_sessions.clone()
    }

    /// Count a session handed out for this drive.
    pub fn record_session(&self) {
        self.lock().sessions_issued += 1;
    }

    /// Number of sessions handed out.
    #[must_use]
    pub fn sessions_issued(&self) -> usize {
        self.lock().sessions_issued
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<DriveCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls of `operation`.
    #[must_use]
    pub fn count(&self, operation: DriveOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Folders named `name` under `parent`, in creation order.
    #[must_use]
    pub fn children(&self, parent: &FolderHandle, name: &str) -> Vec<FolderHandle> {
        self.lock()
            .folders
            .iter()
            .filter(|f| &f.parent == parent && f.name == name)
            .map(|f| f.handle.clone())
            .collect()
    }

    /// Files stored so far. Empty unless the drive is recording.
    #[must_use]
    pub fn files(&self) -> Vec<StoredObject> {
        self.lock().files.clone()
    }
}

impl StorageBackend for MemoryDrive {
    async fn find_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> Result<Vec<FolderHandle>, StorageError> {
        let mut state = self.lock();
        state.record(DriveCall::FindFolder {
            parent: parent.clone(),
            name: name.to_string(),
        });
        state.check_failure(DriveOperation::FindFolder, name)?;

        Ok(state
            .folders
            .iter()
            .filter(|f| &f.parent == parent && f.name == name)
            .map(|f| f.handle.clone())
            .collect())
    }

    async fn create_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> Result<FolderHandle, StorageError> {
        let mut state = self.lock();
        state.record(DriveCall::CreateFolder {
            parent: parent.clone(),
            name: name.to_string(),
        });
        state.check_failure(DriveOperation::CreateFolder, name)?;

        let handle = FolderHandle::new(state.allocate_id("folder"));
        state.folders.push(Folder {
            handle: handle.clone(),
            parent: parent.clone(),
            name: name.to_string(),
        });
        Ok(handle)
    }

    async fn upload_file(
        &self,
        parent: &FolderHandle,
        file: NewFile,
    ) -> Result<StoredFile, StorageError> {
        let mut state = self.lock();
        state.record(DriveCall::UploadFile {
            parent: parent.clone(),
            name: file.name.clone(),
            content_type: file.content_type.clone(),
        });
        state.check_failure(DriveOperation::UploadFile, &file.name)?;

        let id = state.allocate_id("file");
        let link = format!("{}/{id}", Self::LINK_BASE);
        if state.recording {
            state.files.push(StoredObject {
                id: id.clone(),
                parent: parent.clone(),
                name: file.name,
                content_type: file.content_type,
                content: file.content,
            });
        }
        Ok(StoredFile { id, link })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> FolderHandle {
        FolderHandle::new("root")
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let drive = MemoryDrive::recording();
        let created = drive.create_folder(&root(), "Acme").await.unwrap();
        let found = drive.find_folder(&root(), "Acme").await.unwrap();

        assert_eq!(found, vec![created]);
        assert_eq!(drive.count(DriveOperation::CreateFolder), 1);
        assert_eq!(drive.count(DriveOperation::FindFolder), 1);
    }

    #[tokio::test]
    async fn test_find_is_scoped_to_parent() {
        let drive = MemoryDrive::recording();
        let other = drive.insert_folder(&root(), "Other");
        drive.insert_folder(&other, "Acme");

        let found = drive.find_folder(&root(), "Acme").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_returned_in_creation_order() {
        let drive = MemoryDrive::recording();
        let first = drive.insert_folder(&root(), "Acme");
        let second = drive.insert_folder(&root(), "Acme");

        let found = drive.find_folder(&root(), "Acme").await.unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let drive = MemoryDrive::recording();
        drive.fail_on(DriveOperation::CreateFolder, "Acme");

        let err = drive.create_folder(&root(), "Acme").await.unwrap_err();
        assert!(matches!(err, StorageError::Status { status: 503, .. }));
        assert_eq!(drive.calls().len(), 1);
        assert!(drive.children(&root(), "Acme").is_empty());
    }

    #[tokio::test]
    async fn test_upload_stores_content() {
        let drive = MemoryDrive::recording();
        let stored = drive
            .upload_file(
                &root(),
                NewFile {
                    name: "a.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    content: Bytes::from_static(b"hello"),
                },
            )
            .await
            .unwrap();

        assert_eq!(stored.link, format!("{}/{}", MemoryDrive::LINK_BASE, stored.id));
        let files = drive.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, Bytes::from_static(b"hello"));
        assert_eq!(files[0].parent, root());
    }

    #[tokio::test]
    async fn test_default_drive_keeps_no_history_or_content() {
        let drive = MemoryDrive::new();
        let created = drive.create_folder(&root(), "Acme").await.unwrap();
        let stored = drive
            .upload_file(
                &created,
                NewFile {
                    name: "a.txt".to_string(),
                    content_type: "text/plain".to_string(),
                    content: Bytes::from_static(b"hello"),
                },
            )
            .await
            .unwrap();

        assert_eq!(drive.find_folder(&root(), "Acme").await.unwrap(), vec![created]);
        assert_eq!(stored.link, format!("{}/{}", MemoryDrive::LINK_BASE, stored.id));
        assert!(drive.calls().is_empty());
        assert!(drive.files().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let drive = MemoryDrive::recording();
        let clone = drive.clone();
        clone.record_session();
        assert_eq!(drive.sessions_issued(), 1);
    }
}
