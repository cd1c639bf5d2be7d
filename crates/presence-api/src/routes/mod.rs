//! Route definitions

use axum::{routing::get, Router};
use presence_core::STATUS_PATH;

use crate::handlers::{health, status};
use crate::state::AppState;

/// Create the API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().route(STATUS_PATH, get(status::get_status))
}

/// Health check routes (exported separately to skip CORS)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
