//! # presence-core
//!
//! Domain layer for the live presence counter: how a stored counter is read,
//! what the status endpoint returns, and which presence states a client can be in.
//! This crate has zero dependencies on infrastructure (Redis, web framework, etc.).

pub mod presence;
pub mod status;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use presence::{PollError, PresenceState};
pub use status::{StatusResponse, STATUS_PATH};
pub use value_objects::{CacheDirective, CounterReading, ACTIVE_KEY};

use std::time::Duration;

/// Default polling interval, matching the advertised freshness window
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default timeout for a single status request issued by a poller
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
