//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{COUNT_TTL, STATUS_TTL};
use crate::retry::RetryOptions;

/// Voting client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the voting backend
    pub base_url: String,
    /// TTL in milliseconds for status-like reads
    pub status_ttl_ms: u64,
    /// TTL in milliseconds for frequently changing counts
    pub count_ttl_ms: u64,
    /// Maximum retries for rate-limited operations
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Backoff ceiling in milliseconds
    pub max_delay_ms: u64,
    /// Upper bound of the random jitter added to each delay
    pub max_jitter_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Eager cache purge interval in seconds, 0 keeps expiry lazy
    pub purge_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `VOTE_API_BASE_URL` - Backend base URL (default: http://127.0.0.1:3000)
    /// - `STATUS_CACHE_TTL_MS` - Status cache TTL (default: 30000)
    /// - `COUNT_CACHE_TTL_MS` - Count cache TTL (default: 10000)
    /// - `RETRY_MAX_RETRIES` - Max retries on HTTP 429 (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Base backoff delay (default: 2000)
    /// - `RETRY_MAX_DELAY_MS` - Backoff ceiling (default: 30000)
    /// - `RETRY_MAX_JITTER_MS` - Jitter bound (default: 1000)
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout (default: 10)
    /// - `CACHE_PURGE_INTERVAL_SECS` - Eager purge interval (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("VOTE_API_BASE_URL").unwrap_or(defaults.base_url),
            status_ttl_ms: env_or("STATUS_CACHE_TTL_MS", defaults.status_ttl_ms),
            count_ttl_ms: env_or("COUNT_CACHE_TTL_MS", defaults.count_ttl_ms),
            max_retries: env_or("RETRY_MAX_RETRIES", defaults.max_retries),
            base_delay_ms: env_or("RETRY_BASE_DELAY_MS", defaults.base_delay_ms),
            max_delay_ms: env_or("RETRY_MAX_DELAY_MS", defaults.max_delay_ms),
            max_jitter_ms: env_or("RETRY_MAX_JITTER_MS", defaults.max_jitter_ms),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            purge_interval_secs: env_or(
                "CACHE_PURGE_INTERVAL_SECS",
                defaults.purge_interval_secs,
            ),
        }
    }

    /// Retry options derived from this configuration.
    pub fn retry_options(&self) -> RetryOptions {
        RetryOptions {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_jitter: Duration::from_millis(self.max_jitter_ms),
            show_notification: true,
        }
    }

    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ttl_ms)
    }

    pub fn count_ttl(&self) -> Duration {
        Duration::from_millis(self.count_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            status_ttl_ms: STATUS_TTL.as_millis() as u64,
            count_ttl_ms: COUNT_TTL.as_millis() as u64,
            max_retries: 3,
            base_delay_ms: 2_000,
            max_delay_ms: 30_000,
            max_jitter_ms: 1_000,
            request_timeout_secs: 10,
            purge_interval_secs: 0,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.status_ttl_ms, 30_000);
        assert_eq!(config.count_ttl_ms, 10_000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.purge_interval_secs, 0);
    }

    #[test]
    fn test_default_ttls_match_cache_windows() {
        let config = Config::default();
        assert_eq!(config.status_ttl(), STATUS_TTL);
        assert_eq!(config.count_ttl(), COUNT_TTL);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("VOTE_API_BASE_URL");
        env::remove_var("RETRY_MAX_RETRIES");
        env::remove_var("RETRY_BASE_DELAY_MS");

        let config = Config::from_env();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay_ms, 2_000);
    }

    #[test]
    fn test_retry_options_from_config() {
        let config = Config::default();
        let options = config.retry_options();
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.base_delay, Duration::from_millis(2_000));
        assert_eq!(options.max_delay, Duration::from_millis(30_000));
        assert_eq!(options.max_jitter, Duration::from_millis(1_000));
        assert!(options.show_notification);
    }
}
