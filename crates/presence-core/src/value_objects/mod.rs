//! Value objects for the counter read path

mod cache_directive;
mod counter_reading;

pub use cache_directive::CacheDirective;
pub use counter_reading::{CounterReading, ACTIVE_KEY};
