//! Retry Module
//!
//! Rate-limit retries with exponential backoff and jitter.

pub mod backoff;
mod coordinator;

pub use backoff::{backoff_delay, sample_jitter};
pub use coordinator::{RateLimitSignal, RetryCoordinator, RetryOptions};
