//! API route definitions.

use axum::Router;

use stowage_core::credential::SessionProvider;

use crate::AppState;

pub mod health;
pub mod upload;

/// Creates the router with all routes.
pub fn routes<P: SessionProvider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .merge(health::routes())
        .merge(upload::routes())
}
