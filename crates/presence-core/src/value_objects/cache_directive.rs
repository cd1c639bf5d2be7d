//! Cache-Control directive advertised on successful status responses.
//!
//! A short freshness window plus a longer stale-while-revalidate window lets
//! shared caches absorb bursts of polls without each one reaching the store.

use std::fmt;

/// Freshness windows for the status response, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    /// Seconds the response is fresh (used for both `max-age` and `s-maxage`)
    pub max_age: u32,
    /// Seconds a stale copy may be served while revalidating in the background
    pub stale_while_revalidate: u32,
}

impl CacheDirective {
    #[must_use]
    pub const fn new(max_age: u32, stale_while_revalidate: u32) -> Self {
        Self {
            max_age,
            stale_while_revalidate,
        }
    }

    /// Render the `Cache-Control` header value
    #[must_use]
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl Default for CacheDirective {
    fn default() -> Self {
        Self::new(5, 30)
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "public, max-age={age}, s-maxage={age}, stale-while-revalidate={swr}",
            age = self.max_age,
            swr = self.stale_while_revalidate
        )
    }
}
