//! Failure rules attached to a fault key

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule deciding which attempts of a fault key inject a failure.
///
/// A key carries at most one rule. Thresholds are signed so that a
/// configuration of `0` or below is representable; such a rule never
/// injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FailureRule {
    /// Inject on every attempt up to and including `limit`
    FirstN(i64),
    /// Inject only on attempt number `n`
    NthOnly(i64),
}

impl FailureRule {
    /// Configured limit or attempt number
    #[must_use]
    pub const fn threshold(&self) -> i64 {
        match self {
            Self::FirstN(value) | Self::NthOnly(value) => *value,
        }
    }

    /// Whether the 1-based `attempt` should fail under this rule
    #[must_use]
    pub fn triggers(&self, attempt: u64) -> bool {
        match *self {
            Self::NthOnly(n) => u64::try_from(n).is_ok_and(|n| n > 0 && attempt == n),
            Self::FirstN(limit) => {
                u64::try_from(limit).is_ok_and(|limit| limit > 0 && attempt <= limit)
            },
        }
    }

    /// Failures left after `attempts` evaluations
    ///
    /// Only first-N rules have a notion of remaining failures; Nth-only
    /// rules return `None`.
    #[must_use]
    pub fn remaining(&self, attempts: u64) -> Option<u64> {
        match *self {
            Self::FirstN(limit) => {
                Some(u64::try_from(limit).map_or(0, |limit| limit.saturating_sub(attempts)))
            },
            Self::NthOnly(_) => None,
        }
    }

    /// Short label used in logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstN(_) => "first_n",
            Self::NthOnly(_) => "nth_only",
        }
    }
}

impl fmt::Display for FailureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstN(limit) => write!(f, "first {limit}"),
            Self::NthOnly(n) => write!(f, "attempt #{n} only"),
        }
    }
}
