//! Counter store backed by Redis.
//!
//! The counter is written by the chat service; this side only ever issues
//! `GET` (and `PING` for readiness). Each read gets a small, bounded retry
//! budget so that a dropped connection is papered over without letting a
//! dead store stall the caller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::pool::{RedisPool, RedisPoolError};

/// Pause between read attempts
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Error type for counter store operations
#[derive(Debug, thiserror::Error)]
pub enum CounterStoreError {
    #[error("Counter store unavailable after {attempts} attempt(s): {source}")]
    StoreUnavailable {
        attempts: u32,
        #[source]
        source: RedisPoolError,
    },

    #[error("Counter store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for counter store operations
pub type CounterResult<T> = Result<T, CounterStoreError>;

/// Read-only view of the shared counter store
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Read the raw value stored under `key` (`None` if the key is absent)
    async fn get_counter(&self, key: &str) -> CounterResult<Option<String>>;

    /// Check that the store is reachable
    async fn ping(&self) -> CounterResult<()>;
}

/// Counter store shared across request handlers
pub type SharedCounterStore = Arc<dyn CounterStore>;

/// Counter store reading from a Redis pool
#[derive(Debug, Clone)]
pub struct RedisCounterStore {
    pool: RedisPool,
    max_attempts: u32,
}

impl RedisCounterStore {
    /// Default total attempts per read
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

    /// Upper bound on attempts per read: the first try plus one retry
    pub const MAX_ATTEMPTS: u32 = 2;

    /// Create a new counter store over an existing pool
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the total number of attempts per read, clamped to `1..=MAX_ATTEMPTS`
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, Self::MAX_ATTEMPTS);
        self
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wrap into a shareable trait object
    #[must_use]
    pub fn shared(self) -> SharedCounterStore {
        Arc::new(self)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get_counter(&self, key: &str) -> CounterResult<Option<String>> {
        let mut attempt = 1;
        loop {
            match self.pool.get_string(key).await {
                Ok(value) => {
                    tracing::trace!(key = %key, attempt, found = value.is_some(), "Read counter");
                    return Ok(value);
                }
                Err(e) if attempt >= self.max_attempts => {
                    return Err(CounterStoreError::StoreUnavailable {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        key = %key,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Counter read failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }

    async fn ping(&self) -> CounterResult<()> {
        self.pool
            .health_check()
            .await
            .map_err(|e| CounterStoreError::StoreUnavailable {
                attempts: 1,
                source: e,
            })
    }
}
