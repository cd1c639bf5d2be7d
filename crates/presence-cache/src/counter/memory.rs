//! In-process counter store for local runs and tests.
//!
//! Behaves like the Redis store from the caller's point of view, and can be
//! switched into an unavailable state or slowed down to exercise failure paths.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::store::{CounterResult, CounterStore, CounterStoreError, SharedCounterStore};

/// In-memory counter store
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    values: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
    delay: RwLock<Option<Duration>>,
}

impl InMemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.set(key, value);
        store
    }

    /// Store a raw value, as the chat service would
    pub fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    /// Delete a key
    pub fn remove(&self, key: &str) -> bool {
        self.values.write().remove(key).is_some()
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `delay`
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    async fn simulate(&self) -> CounterResult<()> {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CounterStoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get_counter(&self, key: &str) -> CounterResult<Option<String>> {
        self.simulate().await?;
        Ok(self.values.read().get(key).cloned())
    }

    async fn ping(&self) -> CounterResult<()> {
        self.simulate().await
    }
}

impl From<InMemoryCounterStore> for SharedCounterStore {
    fn from(store: InMemoryCounterStore) -> Self {
        Arc::new(store)
    }
}
