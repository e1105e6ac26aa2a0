//! Retry Coordinator
//!
//! Wraps an async operation and retries it with exponential backoff while it
//! keeps failing with a rate-limit signal. One coordinator is constructed by
//! the host and shared (`Arc`) by every caller, so all callers see the same
//! per-identity retry counters.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::notify::{NoticeChannel, RetryNotice};
use crate::retry::backoff::{backoff_delay, sample_jitter};

// == Rate Limit Signal ==
/// Errors that can carry the "rate limited" (HTTP 429) signal.
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

// == Retry Options ==
/// Per-call backoff settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the uniform jitter added to each delay
    pub max_jitter: Duration,
    /// Publish a [`RetryNotice`] before each retry
    pub show_notification: bool,
}

impl RetryOptions {
    /// Delay before the retry following `attempt` earlier retries.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        backoff_delay(
            attempt,
            self.base_delay,
            self.max_delay,
            sample_jitter(self.max_jitter),
        )
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(30_000),
            max_jitter: Duration::from_millis(1000),
            show_notification: true,
        }
    }
}

// == Retry Coordinator ==
/// Shared backoff service keyed by caller-supplied operation identities.
///
/// Sequences for distinct identities are independent. Two overlapping
/// sequences for the same identity share one counter; there is no way to
/// cancel a sequence that is already backing off.
#[derive(Debug, Default)]
pub struct RetryCoordinator {
    /// Consecutive retries per identity, dropped once a sequence ends
    counters: Mutex<HashMap<String, u32>>,
    notices: NoticeChannel<RetryNotice>,
}

impl RetryCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    // == Handle Rate Limit ==
    /// Runs `operation`, retrying while it fails with a rate-limit signal.
    ///
    /// Success clears the identity's counter and returns the value. A failure
    /// that is not rate limited, or one that outlasts `max_retries`, is
    /// returned unchanged.
    pub async fn handle_rate_limit<T, E, F, Fut>(
        &self,
        identity: &str,
        options: &RetryOptions,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RateLimitSignal + Display,
    {
        loop {
            let err = match operation().await {
                Ok(value) => {
                    let retried = self.reset(identity).await;
                    if retried > 0 {
                        info!(operation = identity, retries = retried, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_rate_limited() {
                self.reset(identity).await;
                return Err(err);
            }

            let attempt = self.retry_count(identity).await;
            if attempt >= options.max_retries {
                warn!(
                    operation = identity,
                    max_retries = options.max_retries,
                    error = %err,
                    "Rate limit retries exhausted"
                );
                self.reset(identity).await;
                return Err(err);
            }

            let delay = options.delay_for(attempt);
            debug!(
                operation = identity,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "Rate limited, backing off"
            );
            tokio::time::sleep(delay).await;

            if options.show_notification {
                self.notices.publish(RetryNotice {
                    operation: identity.to_string(),
                    attempt: attempt + 1,
                    max_retries: options.max_retries,
                    delay,
                });
            }

            self.counters
                .lock()
                .await
                .insert(identity.to_string(), attempt + 1);
        }
    }

    // == Retry Count ==
    /// Current consecutive retry count for an identity (0 when idle).
    pub async fn retry_count(&self, identity: &str) -> u32 {
        self.counters
            .lock()
            .await
            .get(identity)
            .copied()
            .unwrap_or(0)
    }

    /// Number of identities with a retry sequence in progress.
    pub async fn tracked_operations(&self) -> usize {
        self.counters.lock().await.len()
    }

    /// Subscribes to the transient retry toasts.
    pub fn subscribe(&self) -> broadcast::Receiver<RetryNotice> {
        self.notices.subscribe()
    }

    async fn reset(&self, identity: &str) -> u32 {
        self.counters.lock().await.remove(identity).unwrap_or(0)
    }
}
