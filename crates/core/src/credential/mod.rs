//! Sessions for the storage API.
//!
//! A [`SessionProvider`] turns process-wide configuration into a
//! [`StorageBackend`] handle. Every call makes a single attempt; sessions are
//! not cached between requests.

mod error;
mod service_account;

use std::future::Future;

pub use error::{AuthError, AuthErrorReason};
pub use service_account::{ServiceAccountProvider, decode_service_account_key};

use crate::storage::{MemoryDrive, StorageBackend};

/// Source of authenticated storage sessions.
pub trait SessionProvider: Send + Sync {
    /// Session type handed to the folder materializer and uploader.
    type Session: StorageBackend;

    /// Obtain a fresh session.
    fn obtain_session(&self) -> impl Future<Output = Result<Self::Session, AuthError>> + Send;
}

impl SessionProvider for MemoryDrive {
    type Session = MemoryDrive;

    async fn obtain_session(&self) -> Result<MemoryDrive, AuthError> {
        if let Some(reason) = self.session_rejection() {
            return Err(AuthError::provider_rejected(reason));
        }
        self.record_session();
        Ok(self.clone())
    }
}
