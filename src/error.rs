//! Error types for the voting client
//!
//! Provides unified error handling using thiserror.

use serde_json::Value;
use thiserror::Error;

use crate::retry::RateLimitSignal;

// == Vote Client Error Enum ==
/// Unified error type for the voting client.
///
/// Classified security conditions are not represented here: they surface as
/// [`crate::security::SecurityState`] plus a `false` result from the guard.
#[derive(Error, Debug)]
pub enum VoteClientError {
    /// Backend answered HTTP 429; retried by the coordinator until exhausted
    #[error("Rate limited (HTTP {status}): {message}")]
    RateLimited {
        status: u16,
        message: String,
        body: Value,
    },

    /// Well-formed failure response without security markers
    #[error("Request failed (HTTP {status}): {message}")]
    Application {
        status: u16,
        message: String,
        body: Value,
    },

    /// No usable response from the backend
    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Client could not be built from the supplied configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Rate Limit Signal ==
impl RateLimitSignal for VoteClientError {
    fn is_rate_limited(&self) -> bool {
        matches!(self, VoteClientError::RateLimited { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the voting client.
pub type Result<T> = std::result::Result<T, VoteClientError>;
