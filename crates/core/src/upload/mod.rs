//! Upload orchestration.
//!
//! This module sequences one upload:
//! - Input validation (before any network call)
//! - Session acquisition
//! - Destination folder materialization
//! - Content transfer

mod error;
mod filename;
mod profile;
mod service;
mod types;

pub use error::{UploadError, UploadErrorReason};
pub use filename::{DerivedNameIssuer, FilenamePolicy, file_extension};
pub use profile::{ProfileError, UploadProfile};
pub use service::UploadOrchestrator;
pub use types::{UploadLimits, UploadRequest, UploadResult};
