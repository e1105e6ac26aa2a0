//! Security Guard
//!
//! Issues the two guarded calls (status check, vote submission), classifies
//! every response and keeps the observable [`SecurityState`] up to date.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::client::api::{VotingApi, STATUS_PATH, VOTE_PATH};
use crate::error::{Result, VoteClientError};
use crate::models::ApiResponse;
use crate::notify::{NoticeChannel, SecurityAlert};
use crate::retry::{RetryCoordinator, RetryOptions};
use crate::security::{classify, SecurityState};

/// Retry identity of the vote submission
pub const SUBMIT_VOTE_OPERATION: &str = "submit-vote";
const CHECK_STATUS_OPERATION: &str = "check-voting-status";

// == Security Guard ==
pub struct SecurityGuard {
    api: Arc<VotingApi>,
    retry: Arc<RetryCoordinator>,
    retry_options: RetryOptions,
    state: RwLock<SecurityState>,
    alerts: NoticeChannel<SecurityAlert>,
}

impl SecurityGuard {
    pub fn new(
        api: Arc<VotingApi>,
        retry: Arc<RetryCoordinator>,
        retry_options: RetryOptions,
    ) -> Self {
        Self {
            api,
            retry,
            retry_options,
            state: RwLock::new(SecurityState::default()),
            alerts: NoticeChannel::new(),
        }
    }

    // == Check Voting Status ==
    /// Asks the backend whether this client may vote.
    ///
    /// Returns `Ok(true)` to proceed and `Ok(false)` when blocked or failed.
    /// Only a transport failure is returned as an error.
    pub async fn check_voting_status(&self) -> Result<bool> {
        let response = recover_rate_limited(self.api.get(STATUS_PATH).await)?;
        Ok(self.apply(CHECK_STATUS_OPERATION, &response).await)
    }

    // == Submit Vote ==
    /// Submits a vote, backing off while the backend answers HTTP 429.
    ///
    /// Same result contract as [`SecurityGuard::check_voting_status`]; an
    /// exhausted rate limit is classified like any other response.
    pub async fn submit_vote<B>(&self, payload: &B) -> Result<bool>
    where
        B: Serialize + ?Sized,
    {
        let api = self.api.as_ref();
        let result = self
            .retry
            .handle_rate_limit(SUBMIT_VOTE_OPERATION, &self.retry_options, move || {
                api.post(VOTE_PATH, payload)
            })
            .await;
        let response = recover_rate_limited(result)?;
        Ok(self.apply(SUBMIT_VOTE_OPERATION, &response).await)
    }

    // == Clear Security Error ==
    /// Explicit BLOCKED -> NORMAL reset, called by the UI.
    pub async fn clear_security_error(&self) {
        if self.state.write().await.clear() {
            info!("Security state cleared");
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SecurityState {
        self.state.read().await.clone()
    }

    pub async fn is_blocked(&self) -> bool {
        self.state.read().await.is_blocked
    }

    /// Subscribes to security modal alerts.
    pub fn subscribe(&self) -> broadcast::Receiver<SecurityAlert> {
        self.alerts.subscribe()
    }

    async fn apply(&self, operation: &str, response: &ApiResponse) -> bool {
        if let Some(error) = classify(&response.body, response.status) {
            warn!(
                operation,
                status = response.status,
                kind = %error.kind(),
                time_remaining = ?error.time_remaining(),
                "Security condition reported"
            );
            self.state.write().await.block(&error);
            self.alerts.publish(SecurityAlert {
                operation: operation.to_string(),
                error,
            });
            return false;
        }

        if response.is_success() {
            true
        } else {
            warn!(
                operation,
                status = response.status,
                error = %response.error_message(),
                "Request failed"
            );
            false
        }
    }
}

/// Turns the transport's 429 error back into a response so it can be
/// classified. Other non-2xx answers already arrive as `Ok`.
fn recover_rate_limited(result: Result<ApiResponse>) -> Result<ApiResponse> {
    match result {
        Err(VoteClientError::RateLimited { status, body, .. }) => {
            Ok(ApiResponse::new(status, body))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recover_rate_limited_body() {
        let body = json!({ "error": "Slow down", "timeRemaining": 30 });
        let recovered = recover_rate_limited(Err(VoteClientError::RateLimited {
            status: 429,
            message: "Slow down".to_string(),
            body: body.clone(),
        }))
        .unwrap();
        assert_eq!(recovered, ApiResponse::new(429, body));
    }

    #[test]
    fn test_recover_passes_other_errors() {
        let result = recover_rate_limited(Err(VoteClientError::InvalidConfig("x".to_string())));
        assert!(matches!(result, Err(VoteClientError::InvalidConfig(_))));

        let result = recover_rate_limited(Err(VoteClientError::Application {
            status: 500,
            message: "boom".to_string(),
            body: json!({ "error": "boom" }),
        }));
        assert!(matches!(
            result,
            Err(VoteClientError::Application { status: 500, .. })
        ));
    }

    #[test]
    fn test_recover_keeps_plain_responses() {
        let response = ApiResponse::new(403, json!({ "success": false, "blocked": true }));
        assert_eq!(
            recover_rate_limited(Ok(response.clone())).unwrap(),
            response
        );
    }
}
