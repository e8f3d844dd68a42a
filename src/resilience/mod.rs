//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transaction lookup:
//!     → retries.rs (attempt loop, transient vs. permanent classification)
//!         → backoff.rs (linear delay before each retry)
//!         → rate_limiter.rs (every attempt waits for a quota slot)
//!         → HTTP request with per-attempt timeout
//! ```
//!
//! # Design Decisions
//! - Every attempt, including retries, consumes a quota slot
//! - Only transient network failures are retried
//! - No overall deadline; worst case is the sum of timeouts and delays

pub mod backoff;
pub mod rate_limiter;
pub mod retries;

pub use rate_limiter::{RateLimiter, RateLimiterError};
pub use retries::{retry_with, RetryPolicy};
