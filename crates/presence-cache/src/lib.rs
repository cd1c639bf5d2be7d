//! # presence-cache
//!
//! Redis access for the live presence counter.
//!
//! ## Features
//!
//! - **Connection Pool**: one managed pool per process, built at start-up and
//!   shared by every request; connections are opened lazily and reused
//! - **Counter Store**: read-only access to the counter written by the chat
//!   service, with per-attempt timeouts and a bounded retry budget
//!
//! ## Example
//!
//! ```ignore
//! use presence_cache::{CounterStore, RedisCounterStore, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::from(&config.redis))?;
//! let store = RedisCounterStore::new(pool);
//!
//! let raw = store.get_counter(presence_core::ACTIVE_KEY).await?;
//! ```

pub mod counter;
pub mod pool;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export counter types
pub use counter::{
    CounterResult, CounterStore, CounterStoreError, InMemoryCounterStore, RedisCounterStore,
    SharedCounterStore,
};
