//! Upload orchestrator implementation.

use tracing::info;

use super::error::UploadError;
use super::filename::{DerivedNameIssuer, FilenamePolicy};
use super::profile::UploadProfile;
use super::types::{UploadLimits, UploadRequest, UploadResult};
use crate::credential::SessionProvider;
use crate::folder::{FolderPath, ensure_path};
use crate::storage::{NewFile, StorageBackend};

/// Validated upload, ready to send.
struct PreparedUpload {
    path: FolderPath,
    file: NewFile,
}

/// Sequences authentication, folder materialization and content transfer.
pub struct UploadOrchestrator<P: SessionProvider> {
    sessions: P,
    limits: UploadLimits,
    names: DerivedNameIssuer,
}

impl<P: SessionProvider> UploadOrchestrator<P> {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(sessions: P, limits: UploadLimits) -> Self {
        Self {
            sessions,
            limits,
            names: DerivedNameIssuer::new(),
        }
    }

    /// Upload constraints in effect.
    #[must_use]
    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Upload `request` under `profile`.
    ///
    /// Input is validated before any network call. Each upload obtains its
    /// own session and resolves its destination folder from scratch.
    ///
    /// # Errors
    ///
    /// Returns an error tagged with the failing stage:
    /// - `validation_failed` for missing or invalid input
    /// - `auth_failed` if no session could be obtained
    /// - `folder_resolution_failed` if the destination folder cannot be materialized
    /// - `transfer_failed` if the content upload fails
    pub async fn upload(
        &self,
        profile: &UploadProfile,
        request: UploadRequest,
    ) -> Result<UploadResult, UploadError> {
        let PreparedUpload { path, file } = self.prepare(profile, request)?;

        let session = self.sessions.obtain_session().await?;
        let folder = ensure_path(&session, &profile.root, &path).await?;

        let stored_name = file.name.clone();
        let stored = session.upload_file(&folder, file).await?;

        info!(
            file_id = %stored.id,
            folder = %folder,
            path = %path,
            name = %stored_name,
            "File uploaded"
        );

        Ok(UploadResult {
            id: stored.id,
            link: stored.link,
            stored_name,
        })
    }

    fn prepare(
        &self,
        profile: &UploadProfile,
        request: UploadRequest,
    ) -> Result<PreparedUpload, UploadError> {
        let path = FolderPath::new(request.path)?;

        let identifier = match profile.filename_policy {
            FilenamePolicy::Verbatim => {
                if request.filename.trim().is_empty() {
                    return Err(UploadError::validation("filename is required"));
                }
                None
            }
            FilenamePolicy::Derived => Some(
                request
                    .identifier
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| UploadError::validation("identifier is required"))?,
            ),
        };

        let size = request.content.len() as u64;
        if size > self.limits.max_file_size {
            return Err(UploadError::validation(format!(
                "file size {size} bytes exceeds maximum allowed {} bytes",
                self.limits.max_file_size
            )));
        }

        let content_type = request
            .content_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.limits.default_content_type.clone());
        if !self.limits.is_mime_type_allowed(&content_type) {
            return Err(UploadError::validation(format!(
                "MIME type '{content_type}' is not allowed"
            )));
        }

        // Consumes a sequence slot; must follow every check
        let name = match identifier {
            Some(identifier) => self.names.issue(identifier, &request.filename),
            None => request.filename,
        };

        Ok(PreparedUpload {
            path,
            file: NewFile {
                name,
                content_type,
                content: request.content,
            },
        })
    }
}
