//! Status endpoint handler
//!
//! GET /api/status always answers with `{"active": n}`. A successful read is
//! a 200 carrying a short shared-cache window; any failure to reach the store
//! is a 500 with `{"active": 0}` and no cache header.

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use presence_core::{CacheDirective, CounterReading, StatusResponse, ACTIVE_KEY};

use crate::state::AppState;

/// Outcome of one status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOutcome {
    pub body: StatusResponse,
    pub status: StatusCode,
    /// Present only when the counter was read successfully
    pub cache: Option<CacheDirective>,
}

impl StatusOutcome {
    fn ok(active: u64, cache: CacheDirective) -> Self {
        Self {
            body: StatusResponse::new(active),
            status: StatusCode::OK,
            cache: Some(cache),
        }
    }

    fn failed() -> Self {
        Self {
            body: StatusResponse::fallback(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            cache: None,
        }
    }
}

impl IntoResponse for StatusOutcome {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(cache) = self.cache {
            if let Ok(value) = HeaderValue::from_str(&cache.header_value()) {
                response.headers_mut().insert(header::CACHE_CONTROL, value);
            }
        }
        response
    }
}

/// Read the counter and build the response. Never fails.
pub async fn handle_status_request(state: &AppState) -> StatusOutcome {
    let Some(store) = state.counter_store() else {
        tracing::error!("Counter store is not configured; reporting fallback status");
        return StatusOutcome::failed();
    };

    let settings = state.settings();
    let read = tokio::time::timeout(settings.read_timeout, store.get_counter(ACTIVE_KEY)).await;

    let raw = match read {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            tracing::error!(key = ACTIVE_KEY, error = %e, "Failed to read active count");
            return StatusOutcome::failed();
        }
        Err(_) => {
            tracing::error!(
                key = ACTIVE_KEY,
                timeout_ms = settings.read_timeout.as_millis(),
                "Timed out reading active count"
            );
            return StatusOutcome::failed();
        }
    };

    let reading = CounterReading::from_raw(raw.as_deref());
    match &reading {
        CounterReading::Present(_) => {}
        CounterReading::Absent => {
            tracing::debug!(key = ACTIVE_KEY, "Active count not set, reporting zero");
        }
        CounterReading::Truncated { count, raw } => {
            tracing::warn!(
                key = ACTIVE_KEY,
                value = %raw,
                count,
                "Stored active count has trailing text, reporting its leading integer"
            );
        }
        CounterReading::Malformed(value) => {
            tracing::warn!(
                key = ACTIVE_KEY,
                value = %value,
                "Stored active count does not start with a non-negative integer, reporting zero"
            );
        }
    }

    StatusOutcome::ok(reading.count(), settings.cache)
}

/// Current active participant count
///
/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> StatusOutcome {
    handle_status_request(&state).await
}
