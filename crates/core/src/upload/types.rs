//! Upload request and result types.

use bytes::Bytes;

use stowage_shared::config::UploadsConfig;

/// One upload, as parsed by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Destination folder names below the profile's root.
    pub path: Vec<String>,
    /// Filename: stored as is under the verbatim policy, and the source of
    /// the extension under the derived policy.
    pub filename: String,
    /// Identity the derived policy builds names from.
    pub identifier: Option<String>,
    /// MIME type sent by the client.
    pub content_type: Option<String>,
    /// File content.
    pub content: Bytes,
}

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// External file identifier.
    pub id: String,
    /// Shareable link.
    pub link: String,
    /// Name the file was stored under.
    pub stored_name: String,
}

/// Upload constraints.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    /// Maximum content size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types; empty allows any.
    pub allowed_mime_types: Vec<String>,
    /// Content type used when the client sends none.
    pub default_content_type: String,
}

impl UploadLimits {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(mime_type))
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Vec::new(),
            default_content_type: "application/octet-stream".to_string(),
        }
    }
}

impl From<&UploadsConfig> for UploadLimits {
    fn from(config: &UploadsConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_mime_types: config.allowed_mime_types.clone(),
            default_content_type: config.default_content_type.clone(),
        }
    }
}
