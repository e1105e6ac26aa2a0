//! Read-cache counters
//!
//! Snapshot of how a [`TtlCache`](crate::cache::TtlCache) has been used.
//! Serialized as-is by `ReadCache::stats` and the CLI.

use serde::Serialize;

/// Counters for one cache. `stored` is filled in when a snapshot is taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Reads that found no entry or only a stale one
    pub misses: u64,
    /// Stale entries dropped by `purge_expired`
    pub purged: u64,
    /// Entries in storage at snapshot time, stale ones included
    pub stored: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one read as a hit or a miss.
    pub fn record_read(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_purged(&mut self, removed: usize) {
        self.purged += removed as u64;
    }

    pub fn reads(&self) -> u64 {
        self.hits + self.misses
    }

    /// Share of reads answered from cache; 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        match self.reads() {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }

    /// Copy of the counters with `stored` set to the current entry count.
    pub fn snapshot(&self, stored: usize) -> Self {
        Self {
            stored,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_split_into_hits_and_misses() {
        let mut stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);

        for hit in [false, true, true, true] {
            stats.record_read(hit);
        }

        assert_eq!((stats.hits, stats.misses), (3, 1));
        assert_eq!(stats.reads(), 4);
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_keeps_counters() {
        let mut stats = CacheStats::new();
        stats.record_read(false);
        stats.record_purged(2);
        stats.record_purged(0);

        let snapshot = stats.snapshot(7);
        assert_eq!(snapshot.stored, 7);
        assert_eq!(snapshot.purged, 2);
        assert_eq!(snapshot.misses, 1);
        // The live counters never carry a stored count
        assert_eq!(stats.stored, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(CacheStats::new().snapshot(4)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "hits": 0, "misses": 0, "purged": 0, "stored": 4 })
        );
    }
}
