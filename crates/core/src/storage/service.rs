//! Drive v3 client built on the generated `google-drive3` hub.

use std::fmt;
use std::future::Future;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use google_drive3 as drive3;
use tracing::debug;

use drive3::api::File;
use drive3::hyper_rustls::HttpsConnector;
use drive3::hyper_util::client::legacy::connect::HttpConnector;
use drive3::hyper_util::rt::TokioExecutor;

use super::backend::{FOLDER_MIME_TYPE, FolderHandle, NewFile, StorageBackend, StoredFile};
use super::config::StorageConfig;
use super::error::StorageError;

/// TLS connector shared by the Drive hub and the OAuth authenticator.
pub type Connector = HttpsConnector<HttpConnector>;

type HttpClient = drive3::common::Client<Connector>;

/// Shared HTTP client for the Drive and OAuth endpoints.
///
/// Cheap to clone. Holds no credentials; see [`DriveSession`].
#[derive(Clone)]
pub struct DriveClient {
    connector: Connector,
    http: HttpClient,
    config: Arc<StorageConfig>,
}

impl fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DriveClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no TLS root certificates can be loaded.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let connector = drive3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| StorageError::Configuration(format!("failed to load root certificates: {e}")))?
            .https_or_http()
            .enable_http2()
            .build();

        let http = drive3::hyper_util::client::legacy::Client::builder(TokioExecutor::new())
            .build(connector.clone());

        Ok(Self {
            connector,
            http,
            config: Arc::new(config),
        })
    }

    /// The TLS connector, for building other clients on the same roots.
    #[must_use]
    pub fn connector(&self) -> Connector {
        self.connector.clone()
    }

    /// Bind an access token to this client.
    #[must_use]
    pub fn session(&self, access_token: impl Into<String>) -> DriveSession {
        let mut hub = drive3::DriveHub::new(self.http.clone(), access_token.into());
        hub.base_url(self.config.base_url.clone());
        hub.root_url(self.config.root_url.clone());

        DriveSession {
            hub,
            timeout: self.config.request_timeout,
        }
    }
}

/// Authenticated Drive API handle, valid for one request.
pub struct DriveSession {
    hub: drive3::DriveHub<Connector>,
    timeout: Duration,
}

impl fmt::Debug for DriveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveSession")
            .field("access_token", &"[hidden]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DriveSession {
    async fn within<T>(
        &self,
        call: impl Future<Output = Result<T, drive3::Error>>,
    ) -> Result<T, StorageError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(StorageError::from),
            Err(_) => Err(StorageError::Transport(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

impl StorageBackend for DriveSession {
    async fn find_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> Result<Vec<FolderHandle>, StorageError> {
        let query = folder_query(parent, name);
        debug!(parent = %parent, name, "Looking up folder");

        let call = self
            .hub
            .files()
            .list()
            .q(&query)
            .supports_all_drives(true)
            .include_items_from_all_drives(true)
            .param("fields", "files(id)")
            .doit();
        let (_, list) = self.within(call).await?;

        list.files
            .ok_or_else(|| StorageError::decode("file list without `files`"))?
            .into_iter()
            .map(|f| {
                f.id
                    .map(FolderHandle::new)
                    .ok_or_else(|| StorageError::decode("listed file without `id`"))
            })
            .collect()
    }

    async fn create_folder(
        &self,
        parent: &FolderHandle,
        name: &str,
    ) -> Result<FolderHandle, StorageError> {
        debug!(parent = %parent, name, "Creating folder");

        let folder = File {
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: Some(vec![parent.as_str().to_string()]),
            ..File::default()
        };
        let call = self
            .hub
            .files()
            .create(folder)
            .supports_all_drives(true)
            .param("fields", "id")
            .doit_without_upload();
        let (_, created) = self.within(call).await?;

        created
            .id
            .map(FolderHandle::new)
            .ok_or_else(|| StorageError::decode("created folder without `id`"))
    }

    async fn upload_file(
        &self,
        parent: &FolderHandle,
        file: NewFile,
    ) -> Result<StoredFile, StorageError> {
        debug!(
            parent = %parent,
            name = %file.name,
            size = file.content.len(),
            "Uploading file"
        );

        let mime: mime::Mime = file
            .content_type
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        let metadata = File {
            name: Some(file.name),
            parents: Some(vec![parent.as_str().to_string()]),
            ..File::default()
        };
        let call = self
            .hub
            .files()
            .create(metadata)
            .supports_all_drives(true)
            .param("fields", "id,webViewLink")
            .upload(Cursor::new(file.content), mime);
        let (_, uploaded) = self.within(call).await?;

        match (uploaded.id, uploaded.web_view_link) {
            (Some(id), Some(link)) => Ok(StoredFile { id, link }),
            _ => Err(StorageError::decode("uploaded file without `id` or `webViewLink`")),
        }
    }
}

/// Drive search query for non-trashed folders named `name` under `parent`.
fn folder_query(parent: &FolderHandle, name: &str) -> String {
    format!(
        "mimeType='{FOLDER_MIME_TYPE}' and name='{}' and '{}' in parents and trashed=false",
        escape_query_literal(name),
        escape_query_literal(parent.as_str()),
    )
}

/// Escape a string literal for the Drive query language.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
