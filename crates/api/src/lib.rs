//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload endpoints and liveness checks
//! - Rendering of upload failures as JSON error bodies

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use stowage_core::credential::SessionProvider;
use stowage_core::upload::{UploadOrchestrator, UploadProfile};

/// Room for multipart boundaries and the text fields next to the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
pub struct AppState<P: SessionProvider> {
    /// Upload orchestrator.
    pub uploads: Arc<UploadOrchestrator<P>>,
    /// Profile for `POST /api/upload`.
    pub upload_profile: Arc<UploadProfile>,
    /// Profile for `POST /api/upload_extras`.
    pub extras_profile: Arc<UploadProfile>,
}

impl<P: SessionProvider> AppState<P> {
    /// Create the state.
    #[must_use]
    pub fn new(
        uploads: UploadOrchestrator<P>,
        upload_profile: UploadProfile,
        extras_profile: UploadProfile,
    ) -> Self {
        Self {
            uploads: Arc::new(uploads),
            upload_profile: Arc::new(upload_profile),
            extras_profile: Arc::new(extras_profile),
        }
    }
}

// Derived Clone would require `P: Clone`.
impl<P: SessionProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            uploads: Arc::clone(&self.uploads),
            upload_profile: Arc::clone(&self.upload_profile),
            extras_profile: Arc::clone(&self.extras_profile),
        }
    }
}

/// Creates the main application router.
pub fn create_router<P: SessionProvider + 'static>(state: AppState<P>) -> Router {
    let max_file_size = usize::try_from(state.uploads.limits().max_file_size).unwrap_or(usize::MAX);
    let body_limit = max_file_size.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
