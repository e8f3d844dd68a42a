//! Retry logic.
//!
//! # Responsibilities
//! - Describe the retry schedule as a value (`RetryPolicy`)
//! - Re-run an operation while its error is classified as transient
//! - Surface the last error once attempts are exhausted
//!
//! # Design Decisions
//! - Classification is a caller-supplied predicate, not baked into the loop
//! - Permanent errors return after a single attempt
//! - The schedule is fixed: no jitter, no retry budget

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::observability::metrics;
use crate::resilience::backoff::linear_schedule;

/// Attempts used for every transaction lookup.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Step of the linear backoff (2s, then 4s).
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Vec<Duration>,
}

impl RetryPolicy {
    /// Build a policy. At least one attempt is always made.
    ///
    /// `backoff[i]` is the delay before attempt `i + 2`; when the sequence is
    /// shorter than needed its last entry is reused.
    pub fn new(max_attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// The lookup schedule: 3 attempts, waiting 2s and 4s between them.
    pub fn fixed() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            linear_schedule(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_STEP),
        )
    }

    /// Never retry.
    pub fn single_attempt() -> Self {
        Self::new(1, Vec::new())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before 1-based `attempt`. The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let index = (attempt - 2) as usize;
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Run `op` under `policy`, retrying only errors for which `is_transient`
/// returns true.
///
/// `op` receives the 1-based attempt number. The returned error is the one
/// produced by the last attempt made.
pub async fn retry_with<T, E, F, Fut, P>(policy: &RetryPolicy, is_transient: P, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 1;
    loop {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) {
                    tracing::debug!(attempt, error = %err, "Permanent failure, not retrying");
                    return Err(err);
                }
                if attempt >= policy.max_attempts() {
                    tracing::warn!(attempt, error = %err, "Retries exhausted");
                    return Err(err);
                }

                tracing::warn!(
                    attempt,
                    next_delay_ms = policy.delay_before(attempt + 1).as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                metrics::record_retry();
                attempt += 1;
            }
        }
    }
}
