//! Storage backends for Drive folders and files.
//!
//! The rest of the crate talks to storage through [`StorageBackend`], which
//! mirrors the three Drive API operations the service needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        StorageBackend                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ find_folder(parent, name)    -> [FolderHandle]                   │
//! │ create_folder(parent, name)  -> FolderHandle                     │
//! │ upload_file(parent, file)    -> StoredFile { id, link }          │
//! ├────────────────────────────────┬────────────────────────────────┤
//! │ DriveSession (DriveHub)        │ MemoryDrive (development)      │
//! └────────────────────────────────┴────────────────────────────────┘
//! ```

mod backend;
mod config;
mod error;
mod memory;
mod service;

pub use backend::{FOLDER_MIME_TYPE, FolderHandle, NewFile, StorageBackend, StoredFile};
pub use config::StorageConfig;
pub use error::StorageError;
pub use memory::{DriveCall, DriveOperation, MemoryDrive, StoredObject};
pub use service::{DriveClient, DriveSession};
