//! Start-up fault spec configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Rules to install when the server starts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecAppConfig {
    /// YAML fault spec applied at start-up
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Seed first-N rules from `FI_FAILURE_COUNTS`
    #[serde(default)]
    pub seed_from_env: bool,
}
