//! Cache Module
//!
//! Provides short-lived in-memory caching of read responses with lazy TTL expiry.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

use std::time::Duration;

// == Public Constants ==
/// Freshness window for status-like reads
pub const STATUS_TTL: Duration = Duration::from_secs(30);

/// Freshness window for frequently changing counts
pub const COUNT_TTL: Duration = Duration::from_secs(10);
