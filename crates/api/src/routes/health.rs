//! Health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use stowage_core::credential::SessionProvider;

use crate::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct LivenessResponse {
    /// Fixed greeting.
    pub message: &'static str,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "Microservice is running",
    })
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates health check routes.
pub fn routes<P: SessionProvider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}
