//! Google service-account sessions.
//!
//! Flow: base64 secret → JSON key → `yup_oauth2` service-account flow
//! (`jwt-bearer` grant) → access token bound to a [`DriveSession`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use google_drive3 as drive3;
use tracing::debug;

use drive3::hyper_util::client::legacy::Client;
use drive3::hyper_util::rt::TokioExecutor;
use drive3::yup_oauth2::{self, ServiceAccountAuthenticator, ServiceAccountKey};

use super::SessionProvider;
use super::error::AuthError;
use crate::storage::{DriveClient, DriveSession};

/// Decode a base64-encoded service-account JSON key. Whitespace in the
/// encoding is ignored.
///
/// # Errors
///
/// Returns `decode_failure` if the input is not base64 or not a key.
pub fn decode_service_account_key(encoded: &str) -> Result<ServiceAccountKey, AuthError> {
    let compact: String = encoded.split_whitespace().collect();
    let raw = STANDARD
        .decode(compact)
        .map_err(|e| AuthError::decode_failure(format!("invalid base64: {e}")))?;
    let json = String::from_utf8(raw)
        .map_err(|e| AuthError::decode_failure(format!("invalid service account key: {e}")))?;

    yup_oauth2::parse_service_account_key(json)
        .map_err(|e| AuthError::decode_failure(format!("invalid service account key: {e}")))
}

/// Session provider backed by a service-account key.
#[derive(Debug, Clone)]
pub struct ServiceAccountProvider {
    encoded_key: Option<String>,
    scopes: Vec<String>,
    client: DriveClient,
}

impl ServiceAccountProvider {
    /// Create a provider. The key is decoded on every session request.
    #[must_use]
    pub fn new(encoded_key: Option<String>, scopes: Vec<String>, client: DriveClient) -> Self {
        Self {
            encoded_key,
            scopes,
            client,
        }
    }

    async fn access_token(&self, key: ServiceAccountKey) -> Result<String, AuthError> {
        let http = Client::builder(TokioExecutor::new()).build::<_, String>(self.client.connector());
        let auth = ServiceAccountAuthenticator::with_client(key, http)
        .build()
        .await
        .map_err(|e| AuthError::decode_failure(format!("invalid private key: {e}")))?;

        let token = auth
            .token(&self.scopes)
            .await
            .map_err(|e| AuthError::provider_rejected(format!("token request failed: {e}")))?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| AuthError::provider_rejected("token response without access token"))
    }
}

impl SessionProvider for ServiceAccountProvider {
    type Session = DriveSession;

    async fn obtain_session(&self) -> Result<DriveSession, AuthError> {
        let encoded = self
            .encoded_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(AuthError::missing_secret)?;

        let key = decode_service_account_key(encoded)?;
        let client_email = key.client_email.clone();
        let access_token = self.access_token(key).await?;

        debug!(client_email = %client_email, "Obtained Drive session");
        Ok(self.client.session(access_token))
    }
}
