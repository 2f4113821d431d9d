//! HTTP API module
//! 
//! Lifecycle signals, unlock and lock queries for the host shell, plus the
//! settings, conversion and two-factor limit helpers used by wallet screens.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/lifecycle/:event", post(lifecycle_handler))
        .route("/unlock", post(unlock_handler))
        .route("/lock", get(lock_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/settings/menu", post(menu_handler))
        .route("/convert", post(convert_handler))
        .route("/two-factor/limit", post(limit_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
