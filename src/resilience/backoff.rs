//! Linear backoff between lookup attempts.

use std::time::Duration;

/// Delay before retry number `retry` (1-based): `retry * step`.
///
/// `retry == 0` is the first attempt and never waits.
pub fn linear_backoff(retry: u32, step: Duration) -> Duration {
    step.saturating_mul(retry)
}

/// Delays before attempts `2..=max_attempts`, in order.
pub fn linear_schedule(max_attempts: u32, step: Duration) -> Vec<Duration> {
    (1..max_attempts).map(|retry| linear_backoff(retry, step)).collect()
}
