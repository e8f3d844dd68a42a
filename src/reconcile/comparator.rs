//! Amount comparison and per-transaction outcomes.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

/// Absolute tolerance: differences up to 1e-8 count as equal.
pub fn tolerance() -> Decimal {
    Decimal::new(1, 8)
}

/// Result of comparing a CSV amount with an API amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Matched,
    /// `difference` is `csv - api`, sign preserved.
    Mismatched { difference: Decimal },
}

/// Classify two amounts for the same transaction.
///
/// The tolerance is absolute regardless of magnitude.
pub fn compare(csv_amount: Decimal, api_amount: Decimal) -> Verdict {
    let difference = csv_amount - api_amount;
    if difference.abs() <= tolerance() {
        Verdict::Matched
    } else {
        Verdict::Mismatched { difference }
    }
}

/// What happened to one CSV row.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    Matched {
        csv_amount: Decimal,
        api_amount: Decimal,
    },
    Mismatched {
        csv_amount: Decimal,
        api_amount: Decimal,
        difference: Decimal,
    },
    Failed {
        reason: String,
    },
}

/// Outcome of reconciling one transaction, traceable to its CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationOutcome {
    pub tx_id: String,
    pub row: usize,
    pub checked_at: DateTime<Local>,
    pub kind: OutcomeKind,
}

impl ReconciliationOutcome {
    /// Compare amounts and record the verdict.
    pub fn compared(tx_id: &str, row: usize, csv_amount: Decimal, api_amount: Decimal) -> Self {
        let kind = match compare(csv_amount, api_amount) {
            Verdict::Matched => OutcomeKind::Matched {
                csv_amount,
                api_amount,
            },
            Verdict::Mismatched { difference } => OutcomeKind::Mismatched {
                csv_amount,
                api_amount,
                difference,
            },
        };
        Self::new(tx_id, row, kind)
    }

    /// The lookup failed; no comparison was made.
    pub fn failed(tx_id: &str, row: usize, reason: impl Into<String>) -> Self {
        Self::new(tx_id, row, OutcomeKind::Failed { reason: reason.into() })
    }

    fn new(tx_id: &str, row: usize, kind: OutcomeKind) -> Self {
        Self {
            tx_id: tx_id.to_string(),
            row,
            checked_at: Local::now(),
            kind,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.kind, OutcomeKind::Matched { .. })
    }

    pub fn is_mismatched(&self) -> bool {
        matches!(self.kind, OutcomeKind::Mismatched { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_tolerance_boundary() {
        assert_eq!(compare(dec("1.00000000"), dec("1.000000005")), Verdict::Matched);
        assert_eq!(compare(dec("1.00000000"), dec("1.00000001")), Verdict::Matched);
        assert_eq!(
            compare(dec("1.00000000"), dec("1.00000002")),
            Verdict::Mismatched {
                difference: dec("-0.00000002")
            }
        );
    }

    #[test]
    fn test_difference_sign_preserved() {
        match compare(dec("10.5"), dec("10")) {
            Verdict::Mismatched { difference } => assert_eq!(difference, dec("0.5")),
            other => panic!("unexpected verdict {:?}", other),
        }
    }

    #[test]
    fn test_tolerance_is_absolute() {
        // A relative error of 1e-12 on a large amount still mismatches.
        let verdict = compare(dec("100000000000"), dec("100000000000.1"));
        assert!(matches!(verdict, Verdict::Mismatched { .. }));
    }

    #[test]
    fn test_outcome_constructors() {
        let matched = ReconciliationOutcome::compared("0x1", 2, dec("3"), dec("3.000000001"));
        assert!(matched.is_matched());
        assert_eq!(matched.row, 2);

        let mismatched = ReconciliationOutcome::compared("0x2", 3, dec("3"), dec("4"));
        assert!(mismatched.is_mismatched());
        assert_eq!(
            mismatched.kind,
            OutcomeKind::Mismatched {
                csv_amount: dec("3"),
                api_amount: dec("4"),
                difference: dec("-1"),
            }
        );

        let failed = ReconciliationOutcome::failed("0x3", 4, "timeout");
        assert!(failed.is_failed());
    }
}
