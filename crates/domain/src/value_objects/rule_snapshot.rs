//! Read-only views over the configured rules

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Remaining failures per key for first-N rules
pub type FaultStatus = BTreeMap<String, u64>;

/// Configured thresholds per key, split by rule kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSnapshot {
    /// First-N limits
    #[serde(default)]
    pub failures: BTreeMap<String, i64>,
    /// Nth-only attempt numbers
    #[serde(default, rename = "precise-failures")]
    pub precise_failures: BTreeMap<String, i64>,
}

impl RuleSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.precise_failures.is_empty()
    }

    /// Total number of configured keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len() + self.precise_failures.len()
    }
}
