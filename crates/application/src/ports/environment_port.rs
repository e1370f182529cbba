//! Port for reading process environment variables
//!
//! Production code reads the real process environment through an adapter in
//! the infrastructure layer. Tests and embedders can supply a
//! [`FixedEnvironment`] instead of mutating the process environment.

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

/// Read-only access to environment variables
#[cfg_attr(test, automock)]
pub trait EnvironmentPort: Send + Sync {
    /// Value of `name`, or `None` when unset or not valid unicode
    fn var(&self, name: &str) -> Option<String>;
}

/// In-memory environment with a fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    vars: HashMap<String, String>,
}

impl FixedEnvironment {
    /// Create an environment with no variables set
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace a variable
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentPort for FixedEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
