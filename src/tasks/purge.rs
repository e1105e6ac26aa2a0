//! Eager Purge Task
//!
//! Optional background task that sweeps stale entries out of a TTL cache.
//! Without it, expiry stays lazy and stale entries are only dropped by
//! explicit invalidation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a task that calls `purge_expired` on the cache every `interval`.
///
/// # Returns
/// A JoinHandle for the spawned task, which the host aborts on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(TtlCache::new(COUNT_TTL)));
/// let handle = spawn_purge_task(cache.clone(), Duration::from_secs(60), "count");
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_purge_task<V>(
    cache: Arc<RwLock<TtlCache<V>>>,
    interval: Duration,
    label: &'static str,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            cache = label,
            interval_ms = interval.as_millis() as u64,
            "Starting cache purge task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.purge_expired();

            if removed > 0 {
                info!(cache = label, removed, "Purged stale cache entries");
            } else {
                debug!(cache = label, "No stale cache entries");
            }
        }
    })
}
