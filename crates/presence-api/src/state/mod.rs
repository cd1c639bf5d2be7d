//! Application state
//!
//! Holds the counter store and the status endpoint settings. The store is
//! built once at start-up and injected here; handlers never create their own.

use std::sync::Arc;
use std::time::Duration;

use presence_cache::{RedisCounterStore, SharedCounterStore};
use presence_common::AppConfig;
use presence_core::CacheDirective;

/// Slack added on top of the store's own per-attempt timeouts, and kept
/// free below the request timeout so the read always gives up first
const READ_TIMEOUT_SLACK: Duration = Duration::from_millis(500);

/// Settings for the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSettings {
    /// Cache directive attached to successful responses
    pub cache: CacheDirective,
    /// Outer bound on one counter read, retries included
    pub read_timeout: Duration,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            cache: CacheDirective::default(),
            read_timeout: Duration::from_secs(5),
        }
    }
}

impl StatusSettings {
    /// Derive settings from configuration
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let attempts = config
            .redis
            .max_attempts
            .clamp(1, RedisCounterStore::MAX_ATTEMPTS);
        let read_timeout = (config.redis.command_timeout() * attempts + READ_TIMEOUT_SLACK)
            .min(config.api.request_timeout().saturating_sub(READ_TIMEOUT_SLACK));

        Self {
            cache: CacheDirective::new(
                config.status.max_age_secs,
                config.status.stale_while_revalidate_secs,
            ),
            read_timeout,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Counter store, absent when the server started in degraded mode
    counter_store: Option<SharedCounterStore>,
    settings: Arc<StatusSettings>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(counter_store: Option<SharedCounterStore>, settings: StatusSettings) -> Self {
        Self {
            counter_store,
            settings: Arc::new(settings),
        }
    }

    /// Get the counter store, if one is configured
    pub fn counter_store(&self) -> Option<&SharedCounterStore> {
        self.counter_store.as_ref()
    }

    /// Get the status endpoint settings
    pub fn settings(&self) -> &StatusSettings {
        &self.settings
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("counter_store", &self.counter_store.as_ref().map(|_| "CounterStore"))
            .field("settings", &self.settings)
            .finish()
    }
}
