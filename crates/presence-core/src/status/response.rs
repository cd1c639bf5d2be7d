//! Body returned by the status endpoint.
//!
//! The same shape is used for successes and failures; a failed read is
//! reported as `{"active": 0}` with a 500 status rather than an error body.

use serde::{Deserialize, Serialize};

/// Path the status endpoint is mounted on
pub const STATUS_PATH: &str = "/api/status";

/// Snapshot of the active participant count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Number of active participants (never negative)
    pub active: u64,
}

impl StatusResponse {
    #[must_use]
    pub const fn new(active: u64) -> Self {
        Self { active }
    }

    /// Default body used whenever the counter could not be read
    #[must_use]
    pub const fn fallback() -> Self {
        Self { active: 0 }
    }

    /// Leniently extract the count from a response body.
    ///
    /// A missing `active` field, a value that is not a non-negative integer,
    /// or a body that is not JSON at all all yield zero.
    #[must_use]
    pub fn count_from_body(body: &[u8]) -> u64 {
        serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("active").and_then(serde_json::Value::as_u64))
            .unwrap_or(0)
    }
}
