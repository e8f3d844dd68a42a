//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and histograms via `metrics`)
//!
//! Consumers:
//!     → stderr (text or JSON lines)
//!     → optional Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
