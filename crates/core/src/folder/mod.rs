//! Folder paths and idempotent folder materialization.

mod error;
mod materializer;
mod path;

pub use error::{FolderError, FolderErrorReason};
pub use materializer::ensure_path;
pub use path::{FolderPath, FolderPathError};
