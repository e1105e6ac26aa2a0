//! Vote Guard - client-side resilience layer for the voting client
//!
//! Caches short-lived read responses, retries rate-limited calls with
//! exponential backoff, and classifies security-policy errors (blocked
//! voting, invalid session, rate limiting) apart from ordinary failures.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod retry;
pub mod security;
pub mod tasks;

pub use cache::TtlCache;
pub use client::{ReadCache, VotingApi};
pub use config::Config;
pub use error::{Result, VoteClientError};
pub use retry::{RetryCoordinator, RetryOptions};
pub use security::{classify, SecurityError, SecurityGuard, SecurityState};
pub use tasks::spawn_purge_task;
