//! TTL Cache Module
//!
//! Keyed freshness store. Expiry is evaluated lazily at read time: a stale
//! entry stays in storage until it is invalidated, cleared or purged.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Keyed store answering "is this still fresh" against one TTL.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Read statistics
    stats: CacheStats,
    /// Freshness window for every entry
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == Get ==
    /// Returns the stored value if the entry exists and is live.
    ///
    /// A stale entry is reported as a miss but left in storage.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_live(self.ttl) => {
                self.stats.record_read(true);
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_read(false);
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites a value, resetting its capture time to now.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
    }

    // == Invalidate ==
    /// Removes one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Size ==
    /// Number of stored entries, including expired-but-unpurged ones.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    // == Is Expired ==
    /// True if the key is absent or its entry is past the TTL.
    pub fn is_expired(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map_or(true, |entry| !entry.is_live(self.ttl))
    }

    // == Purge Expired ==
    /// Removes all stale entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(ttl));
        let removed = before - self.entries.len();
        self.stats.record_purged(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
