//! Read-only access to the live counter.

mod memory;
mod store;

pub use memory::InMemoryCounterStore;
pub use store::{
    CounterResult, CounterStore, CounterStoreError, RedisCounterStore, SharedCounterStore,
};
