//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Drive API configuration.
    #[serde(default)]
    pub drive: DriveConfig,
    /// Named root folders (root name -> Drive folder id).
    #[serde(default)]
    pub roots: HashMap<String, String>,
    /// Upload constraints.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Per-endpoint upload profiles.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5005
}

/// Which storage backend serves uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveProviderKind {
    /// Google Drive v3 REST API.
    #[default]
    Google,
    /// In-process emulation (development only).
    Memory,
}

/// Drive API configuration.
#[derive(Clone, Deserialize)]
pub struct DriveConfig {
    /// Backend selection.
    #[serde(default)]
    pub provider: DriveProviderKind,
    /// Base64-encoded service-account JSON key.
    #[serde(default)]
    pub service_account_key: Option<String>,
    /// OAuth scopes requested for the session.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Drive metadata API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Google APIs root URL; media uploads are sent under it.
    #[serde(default = "default_root_url")]
    pub root_url: String,
    /// HTTP client timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveConfig")
            .field("provider", &self.provider)
            .field(
                "service_account_key",
                &self.service_account_key.as_ref().map(|_| "[hidden]"),
            )
            .field("scopes", &self.scopes)
            .field("base_url", &self.base_url)
            .field("root_url", &self.root_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            provider: DriveProviderKind::default(),
            service_account_key: None,
            scopes: default_scopes(),
            base_url: default_base_url(),
            root_url: default_root_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_scopes() -> Vec<String> {
    vec!["https://www.googleapis.com/auth/drive".to_string()]
}

fn default_base_url() -> String {
    "https://www.googleapis.com/drive/v3/".to_string()
}

fn default_root_url() -> String {
    "https://www.googleapis.com/".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

/// Upload constraints.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Maximum file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types. Empty accepts any type.
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
    /// Content type used when the client sends none.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_mime_types: Vec::new(),
            default_content_type: default_content_type(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

/// How the stored filename is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenamePolicyKind {
    /// Caller-supplied filename, used as is.
    Verbatim,
    /// `{identifier}_{timestamp}{ext}`, unique per identifier.
    Derived,
}

/// Upload profile for one endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Name of the root folder (key into `roots`).
    pub root: String,
    /// Filename policy.
    pub filename_policy: FilenamePolicyKind,
}

/// Profiles for the upload endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    /// `POST /api/upload`.
    #[serde(default = "default_upload_endpoint")]
    pub upload: EndpointConfig,
    /// `POST /api/upload_extras`.
    #[serde(default = "default_extras_endpoint")]
    pub extras: EndpointConfig,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            upload: default_upload_endpoint(),
            extras: default_extras_endpoint(),
        }
    }
}

fn default_upload_endpoint() -> EndpointConfig {
    EndpointConfig {
        root: "primary".to_string(),
        filename_policy: FilenamePolicyKind::Verbatim,
    }
}

fn default_extras_endpoint() -> EndpointConfig {
    EndpointConfig {
        root: "secondary".to_string(),
        filename_policy: FilenamePolicyKind::Derived,
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// `STOWAGE__SECTION__KEY` variables, then the legacy
    /// `GOOGLE_SERVICE_ACCOUNT_KEY`, `PARENT_FOLDER_ID` and
    /// `SECOND_PARENT_FOLDER_ID` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STOWAGE").separator("__"))
            .set_override_option(
                "drive.service_account_key",
                std::env::var("GOOGLE_SERVICE_ACCOUNT_KEY").ok(),
            )?
            .set_override_option("roots.primary", std::env::var("PARENT_FOLDER_ID").ok())?
            .set_override_option(
                "roots.secondary",
                std::env::var("SECOND_PARENT_FOLDER_ID").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}
