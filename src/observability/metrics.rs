//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reconciler_queries_total` (counter): lookups by result (success/failure)
//! - `reconciler_retries_total` (counter): transient failures retried
//! - `reconciler_rate_limited_total` (counter): admissions that had to wait
//! - `reconciler_rate_limit_wait_seconds` (histogram): time spent waiting for a slot
//! - `reconciler_outcomes_total` (counter): rows by outcome (matched/mismatched/failed)
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::reconcile::comparator::{OutcomeKind, ReconciliationOutcome};

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_query(success: bool) {
    let result = if success { "success" } else { "failure" };
    ::metrics::counter!("reconciler_queries_total", "result" => result).increment(1);
}

pub fn record_retry() {
    ::metrics::counter!("reconciler_retries_total").increment(1);
}

pub fn record_rate_limited(wait: Duration) {
    ::metrics::counter!("reconciler_rate_limited_total").increment(1);
    ::metrics::histogram!("reconciler_rate_limit_wait_seconds").record(wait.as_secs_f64());
}

pub fn record_outcome(outcome: &ReconciliationOutcome) {
    let kind = match outcome.kind {
        OutcomeKind::Matched { .. } => "matched",
        OutcomeKind::Mismatched { .. } => "mismatched",
        OutcomeKind::Failed { .. } => "failed",
    };
    ::metrics::counter!("reconciler_outcomes_total", "outcome" => kind).increment(1);
}
