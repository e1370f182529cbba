//! Per-key rule and attempt counter

use serde::{Deserialize, Serialize};

use super::FailureRule;

/// Outcome of one evaluation of a fault point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptOutcome {
    /// 1-based attempt number assigned to this evaluation
    pub attempt: u64,
    /// Whether the rule asks for a failure on this attempt
    pub injected: bool,
}

/// A configured injection point: its rule and the number of completed
/// evaluations since the rule was installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPoint {
    rule: FailureRule,
    attempts: u64,
}

impl FaultPoint {
    /// Create a fault point with a fresh counter
    #[must_use]
    pub const fn new(rule: FailureRule) -> Self {
        Self { rule, attempts: 0 }
    }

    /// Active rule
    #[must_use]
    pub const fn rule(&self) -> FailureRule {
        self.rule
    }

    /// Completed evaluations
    #[must_use]
    pub const fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Count one attempt and decide whether it fails
    pub fn advance(&mut self) -> AttemptOutcome {
        self.attempts = self.attempts.saturating_add(1);
        AttemptOutcome {
            attempt: self.attempts,
            injected: self.rule.triggers(self.attempts),
        }
    }

    /// Remaining failures for first-N rules
    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.rule.remaining(self.attempts)
    }
}
