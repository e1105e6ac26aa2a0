//! Notification Channels
//!
//! Broadcast channels the host UI subscribes to. The retry toast and the
//! security modal each get their own channel, so the two never depend on
//! each other and may both fire for the same call sequence.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::security::SecurityError;

/// Buffered notices per channel before slow subscribers start lagging
pub const CHANNEL_CAPACITY: usize = 64;

// == Retry Notice ==
/// Transient "retrying" toast emitted by the retry coordinator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryNotice {
    /// Identity of the operation being retried
    pub operation: String,
    /// 1-based retry attempt that is about to run
    pub attempt: u32,
    pub max_retries: u32,
    /// Backoff that was waited before this attempt
    #[serde(with = "duration_ms")]
    pub delay: Duration,
}

// == Security Alert ==
/// Blocking, user-acknowledged modal raised on a classified security error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityAlert {
    /// Guarded operation that produced the error
    pub operation: String,
    pub error: SecurityError,
}

// == Notice Channel ==
/// Thin wrapper over a broadcast sender where publishing never fails.
#[derive(Debug, Clone)]
pub struct NoticeChannel<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> NoticeChannel<T> {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publishes a notice. Having no subscriber is not an error.
    pub fn publish(&self, notice: T) {
        if self.sender.send(notice).is_err() {
            trace!("Notice dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Default for NoticeChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let channel = NoticeChannel::new();
        let mut rx = channel.subscribe();

        channel.publish(RetryNotice {
            operation: "submit-vote".to_string(),
            attempt: 1,
            max_retries: 3,
            delay: Duration::from_millis(2000),
        });

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.operation, "submit-vote");
        assert_eq!(notice.attempt, 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let channel: NoticeChannel<u32> = NoticeChannel::new();
        channel.publish(7);

        // A late subscriber does not see notices sent before it joined
        let mut rx = channel.subscribe();
        assert!(rx.try_recv().is_err());
        channel.publish(8);
        assert_eq!(rx.try_recv().unwrap(), 8);
    }

    #[test]
    fn test_retry_notice_serializes_delay_in_ms() {
        let notice = RetryNotice {
            operation: "op".to_string(),
            attempt: 2,
            max_retries: 3,
            delay: Duration::from_millis(4500),
        };
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"delay\":4500"));
    }
}
