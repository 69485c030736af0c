//! Stowage API Server
//!
//! Main entry point for the Drive upload service.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stowage_api::{AppState, create_router};
use stowage_core::credential::{ServiceAccountProvider, SessionProvider};
use stowage_core::storage::{DriveClient, MemoryDrive, StorageConfig};
use stowage_core::upload::{UploadLimits, UploadOrchestrator, UploadProfile};
use stowage_shared::{AppConfig, DriveProviderKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stowage=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Unknown roots are fatal here rather than per request
    let upload_profile = UploadProfile::resolve(&config.endpoints.upload, &config.roots)
        .context("Invalid `upload` endpoint profile")?;
    let extras_profile = UploadProfile::resolve(&config.endpoints.extras, &config.roots)
        .context("Invalid `extras` endpoint profile")?;
    info!(
        upload_root = %upload_profile.root,
        extras_root = %extras_profile.root,
        "Upload profiles resolved"
    );

    let limits = UploadLimits::from(&config.uploads);

    match config.drive.provider {
        DriveProviderKind::Google => {
            let storage = StorageConfig::new()
                .with_base_url(&config.drive.base_url)
                .with_root_url(&config.drive.root_url)
                .with_request_timeout(Duration::from_secs(config.drive.request_timeout_secs));
            let client = DriveClient::new(storage).context("Failed to build Drive client")?;

            if config.drive.service_account_key.is_none() {
                warn!("No service account key configured; uploads will fail to authenticate");
            }

            let provider = ServiceAccountProvider::new(
                config.drive.service_account_key.clone(),
                config.drive.scopes.clone(),
                client,
            );
            info!("Google Drive provider configured");

            let state = AppState::new(
                UploadOrchestrator::new(provider, limits),
                upload_profile,
                extras_profile,
            );
            serve(&config, state).await
        }
        DriveProviderKind::Memory => {
            warn!("Using in-memory Drive; uploaded files are not persisted");

            let state = AppState::new(
                UploadOrchestrator::new(MemoryDrive::new(), limits),
                upload_profile,
                extras_profile,
            );
            serve(&config, state).await
        }
    }
}

async fn serve<P: SessionProvider + 'static>(
    config: &AppConfig,
    state: AppState<P>,
) -> anyhow::Result<()> {
    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
