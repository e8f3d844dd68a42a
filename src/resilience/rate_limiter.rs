//! Sliding-window rate limiter for outbound API calls.
//!
//! The provider quota is expressed as "at most N requests in any rolling
//! window of W". Every admission records its send instant; instants older
//! than W are pruned before each check, so the recorded sequence never holds
//! more than N entries.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// Invalid limiter configuration, rejected at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimiterError {
    /// A zero quota would block every caller forever.
    #[error("rate limit quota must be at least 1 request per window")]
    InvalidQuota,

    /// A zero-length window makes the quota meaningless.
    #[error("rate limit window must be longer than zero")]
    InvalidWindow,
}

/// Blocking sliding-window limiter shared by every request of one client.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per rolling `window`.
    pub fn new(max_requests: usize, window: Duration) -> Result<Self, RateLimiterError> {
        if max_requests == 0 {
            return Err(RateLimiterError::InvalidQuota);
        }
        if window.is_zero() {
            return Err(RateLimiterError::InvalidWindow);
        }

        Ok(Self {
            max_requests,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        })
    }

    /// Build a limiter from the `[rate_limit]` config section.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self, RateLimiterError> {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Wait until a request may be sent, then record it.
    ///
    /// The lock is only held while inspecting and mutating the timestamp
    /// sequence. Waiting for the oldest entry to expire happens outside it,
    /// after which the check is repeated.
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut timestamps = self.lock();
                let now = Instant::now();
                self.prune(&mut timestamps, now);

                if timestamps.len() < self.max_requests {
                    timestamps.push_back(now);
                    return;
                }

                match timestamps.front() {
                    Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
                    None => Duration::ZERO,
                }
            };

            if !wait.is_zero() {
                tracing::debug!(
                    wait_ms = wait.as_millis() as u64,
                    quota = self.max_requests,
                    "Rate limit reached, waiting for a slot"
                );
                metrics::record_rate_limited(wait);
                sleep(wait).await;
            }
        }
    }

    /// Number of admissions still inside the current window.
    pub fn recorded(&self) -> usize {
        let mut timestamps = self.lock();
        self.prune(&mut timestamps, Instant::now());
        timestamps.len()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        // The sequence stays consistent even if a holder panicked mid-prune.
        self.timestamps.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
