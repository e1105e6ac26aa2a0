//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

/// Delay before retry `attempt` (0-based):
/// `min(base * 2^attempt + jitter, max)`.
///
/// Pure, saturating arithmetic; the jitter is supplied by the caller.
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration, jitter: Duration) -> Duration {
    let base_ms = base.as_millis() as u64;
    let exponential_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    let delay_ms = exponential_ms.saturating_add(jitter.as_millis() as u64);

    Duration::from_millis(delay_ms).min(max)
}

/// Uniform random jitter in `0..=max_jitter`.
pub fn sample_jitter(max_jitter: Duration) -> Duration {
    let max_ms = max_jitter.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
