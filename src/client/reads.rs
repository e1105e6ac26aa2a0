//! Cached Reads
//!
//! TTL caches in front of the read-only endpoints. Independent of the
//! retry/classification path: a read is never retried and never changes the
//! security state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{CacheStats, TtlCache};
use crate::client::api::{
    VotingApi, COUNT_PATH, HEALTH_PATH, HISTORY_PATH, QUEUE_STATUS_PATH, SESSION_DEBUG_PATH,
    STATUS_PATH,
};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::spawn_purge_task;

/// Shared handle on one TTL cache of response data
pub type SharedCache = Arc<RwLock<TtlCache<Value>>>;

// == Read Endpoint ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadEndpoint {
    Status,
    Count,
    History,
    QueueStatus,
    SessionDebug,
    Health,
}

impl ReadEndpoint {
    pub const ALL: [ReadEndpoint; 6] = [
        ReadEndpoint::Status,
        ReadEndpoint::Count,
        ReadEndpoint::History,
        ReadEndpoint::QueueStatus,
        ReadEndpoint::SessionDebug,
        ReadEndpoint::Health,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ReadEndpoint::Status => STATUS_PATH,
            ReadEndpoint::Count => COUNT_PATH,
            ReadEndpoint::History => HISTORY_PATH,
            ReadEndpoint::QueueStatus => QUEUE_STATUS_PATH,
            ReadEndpoint::SessionDebug => SESSION_DEBUG_PATH,
            ReadEndpoint::Health => HEALTH_PATH,
        }
    }

    /// Cache key; the path is unique per endpoint.
    fn key(self) -> &'static str {
        self.path()
    }

    /// Counts change often and get the short TTL.
    fn is_volatile(self) -> bool {
        matches!(self, ReadEndpoint::Count | ReadEndpoint::QueueStatus)
    }
}

/// Statistics of both read caches.
#[derive(Debug, Clone, Serialize)]
pub struct ReadCacheStats {
    pub status: CacheStats,
    pub count: CacheStats,
}

// == Read Cache ==
#[derive(Debug, Clone)]
pub struct ReadCache {
    api: Arc<VotingApi>,
    /// Status, history, session-debug and health
    status_cache: SharedCache,
    /// Count and queue-status
    count_cache: SharedCache,
}

impl ReadCache {
    pub fn new(api: Arc<VotingApi>, status_ttl: Duration, count_ttl: Duration) -> Self {
        Self {
            api,
            status_cache: Arc::new(RwLock::new(TtlCache::new(status_ttl))),
            count_cache: Arc::new(RwLock::new(TtlCache::new(count_ttl))),
        }
    }

    pub fn from_config(api: Arc<VotingApi>, config: &Config) -> Self {
        Self::new(api, config.status_ttl(), config.count_ttl())
    }

    // == Fetch ==
    /// Returns the endpoint's data, from cache while it is fresh.
    ///
    /// Only success envelopes are cached. A failure envelope surfaces as
    /// `VoteClientError::Application`.
    pub async fn fetch(&self, endpoint: ReadEndpoint) -> Result<Value> {
        let cache = self.cache_for(endpoint);
        if let Some(data) = cache.write().await.get(endpoint.key()) {
            debug!(endpoint = endpoint.path(), "Read cache hit");
            return Ok(data);
        }

        let response = self.api.get(endpoint.path()).await?.into_success()?;
        let data = response.data();
        cache.write().await.set(endpoint.key(), data.clone());
        debug!(endpoint = endpoint.path(), "Read cache refreshed");
        Ok(data)
    }

    pub async fn voting_status(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::Status).await
    }

    pub async fn vote_count(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::Count).await
    }

    pub async fn vote_history(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::History).await
    }

    pub async fn queue_status(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::QueueStatus).await
    }

    pub async fn session_debug(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::SessionDebug).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.fetch(ReadEndpoint::Health).await
    }

    // == Invalidation ==
    pub async fn invalidate(&self, endpoint: ReadEndpoint) {
        self.cache_for(endpoint)
            .write()
            .await
            .invalidate(endpoint.key());
    }

    /// Drops cached counts, e.g. right after a vote was accepted.
    pub async fn invalidate_counts(&self) {
        self.count_cache.write().await.clear();
    }

    pub async fn invalidate_all(&self) {
        self.status_cache.write().await.clear();
        self.count_cache.write().await.clear();
    }

    pub async fn stats(&self) -> ReadCacheStats {
        ReadCacheStats {
            status: self.status_cache.read().await.stats(),
            count: self.count_cache.read().await.stats(),
        }
    }

    /// Starts eager purging of both caches every `interval`.
    pub fn spawn_purge_tasks(&self, interval: Duration) -> Vec<JoinHandle<()>> {
        vec![
            spawn_purge_task(self.status_cache.clone(), interval, "status"),
            spawn_purge_task(self.count_cache.clone(), interval, "count"),
        ]
    }

    fn cache_for(&self, endpoint: ReadEndpoint) -> &SharedCache {
        if endpoint.is_volatile() {
            &self.count_cache
        } else {
            &self.status_cache
        }
    }
}
