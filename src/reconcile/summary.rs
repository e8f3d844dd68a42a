//! Run totals.

use crate::reconcile::comparator::ReconciliationOutcome;

/// Counters for one reconciliation run.
///
/// `successful` counts every row whose lookup succeeded, so it includes the
/// mismatched ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub mismatched: usize,
    pub failed: usize,
    /// The run stopped on an interrupt before reaching the last row.
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &ReconciliationOutcome) {
        if outcome.is_failed() {
            self.failed += 1;
            return;
        }
        self.successful += 1;
        if outcome.is_mismatched() {
            self.mismatched += 1;
        }
    }

    pub fn matched(&self) -> usize {
        self.successful - self.mismatched
    }

    pub fn processed(&self) -> usize {
        self.successful + self.failed
    }

    /// Percentage of checked rows that matched; `None` if nothing was checked.
    pub fn match_rate(&self) -> Option<f64> {
        if self.successful == 0 {
            return None;
        }
        Some(self.matched() as f64 / self.successful as f64 * 100.0)
    }

    pub fn is_clean(&self) -> bool {
        self.mismatched == 0 && self.failed == 0 && !self.interrupted
    }
}
