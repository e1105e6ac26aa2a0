//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with capture time.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and capture time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic capture timestamp
    pub captured_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry captured now.
    pub fn new(value: V) -> Self {
        Self {
            value,
            captured_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was captured.
    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    // == Is Live ==
    /// Checks whether the entry is still fresh for the given TTL.
    ///
    /// Boundary condition: an entry whose age equals the TTL is stale, so a
    /// zero TTL never yields a live entry.
    pub fn is_live(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}
