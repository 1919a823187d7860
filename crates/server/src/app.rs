//! Router assembly.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the HTTP application.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/healthz", get(handlers::healthz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
