//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};

use crate::response::{HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with store health
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let redis_healthy = match state.counter_store() {
        Some(store) => {
            let timeout = state.settings().read_timeout;
            matches!(tokio::time::timeout(timeout, store.ping()).await, Ok(Ok(())))
        }
        None => false,
    };

    let response = ReadinessResponse::ready(redis_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
