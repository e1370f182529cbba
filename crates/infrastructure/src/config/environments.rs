//! Environment classification lists.

use domain::{DEFAULT_ALLOWED_ENVIRONMENTS, DEFAULT_PRODUCTION_ENVIRONMENTS, EnvironmentLists};
use serde::{Deserialize, Serialize};

/// Which environment names allow fault injection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentsConfig {
    /// Names where injection is allowed
    #[serde(default = "default_allowed")]
    pub allowed: Vec<String>,

    /// Names treated as production (checked first)
    #[serde(default = "default_production")]
    pub production: Vec<String>,
}

fn default_allowed() -> Vec<String> {
    DEFAULT_ALLOWED_ENVIRONMENTS.map(String::from).to_vec()
}

fn default_production() -> Vec<String> {
    DEFAULT_PRODUCTION_ENVIRONMENTS.map(String::from).to_vec()
}

impl Default for EnvironmentsConfig {
    fn default() -> Self {
        Self {
            allowed: default_allowed(),
            production: default_production(),
        }
    }
}

impl EnvironmentsConfig {
    /// Convert into domain classification lists
    pub fn to_lists(&self) -> EnvironmentLists {
        EnvironmentLists::new(&self.allowed, &self.production)
    }
}
