//! Result of one sync attempt.

use serde::{Deserialize, Serialize};

/// What happened to one sync attempt.
///
/// Single and batch delivery settle as one request-level verdict; sequential
/// delivery settles point by point. [`SyncOutcome::delivered_flags`] expands
/// either form into per-submitted-point flags so the store can reconcile the
/// queue uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// Verdict for a whole single or batch request.
    Request {
        /// Whether the request was confirmed delivered.
        delivered: bool,
        /// Server-supplied representative address, when returned.
        address: Option<String>,
    },

    /// Per-point verdicts for a sequential run, aligned with submission order.
    PerPoint {
        /// One flag per submitted point, in submission order.
        delivered: Vec<bool>,
        /// Server-supplied representative address, when returned.
        address: Option<String>,
    },
}

impl SyncOutcome {
    /// A fully delivered request-level outcome.
    pub fn delivered(address: Option<String>) -> Self {
        Self::Request {
            delivered: true,
            address,
        }
    }

    /// The server-supplied address metadata, if any.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Request { address, .. } | Self::PerPoint { address, .. } => address.as_deref(),
        }
    }

    /// Expand to one delivery flag per submitted point.
    ///
    /// For a request-level outcome the single verdict applies to every
    /// submitted point. For per-point outcomes the recorded flags are used;
    /// a length mismatch with `submitted` is treated as not-delivered for
    /// the unaccounted tail so reconciliation never removes an unconfirmed
    /// point.
    pub fn delivered_flags(&self, submitted: usize) -> Vec<bool> {
        match self {
            Self::Request { delivered, .. } => vec![*delivered; submitted],
            Self::PerPoint { delivered, .. } => {
                let mut flags = delivered.clone();
                flags.resize(submitted, false);
                flags.truncate(submitted);
                flags
            }
        }
    }

    /// Whether every submitted point was confirmed delivered.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Request { delivered, .. } => *delivered,
            Self::PerPoint { delivered, .. } => delivered.iter().all(|d| *d),
        }
    }

    /// Count of confirmed-delivered points, given how many were submitted.
    pub fn delivered_count(&self, submitted: usize) -> usize {
        self.delivered_flags(submitted).iter().filter(|d| **d).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_outcome_expands_to_all_flags() {
        let outcome = SyncOutcome::delivered(Some("Tokyo".into()));
        assert_eq!(outcome.delivered_flags(3), vec![true, true, true]);
        assert!(outcome.is_complete());
        assert_eq!(outcome.address(), Some("Tokyo"));
    }

    #[test]
    fn failed_request_outcome_expands_to_no_flags() {
        let outcome = SyncOutcome::Request {
            delivered: false,
            address: None,
        };
        assert_eq!(outcome.delivered_flags(2), vec![false, false]);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn per_point_outcome_keeps_order() {
        let outcome = SyncOutcome::PerPoint {
            delivered: vec![true, false, true],
            address: None,
        };
        assert_eq!(outcome.delivered_flags(3), vec![true, false, true]);
        assert_eq!(outcome.delivered_count(3), 2);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn short_per_point_outcome_never_over_delivers() {
        let outcome = SyncOutcome::PerPoint {
            delivered: vec![true],
            address: None,
        };
        assert_eq!(outcome.delivered_flags(3), vec![true, false, false]);
    }
}
