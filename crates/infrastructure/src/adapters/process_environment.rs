//! Process environment adapter
//!
//! Reads variables from the real process environment.

use std::env;

use application::ports::EnvironmentPort;
use tracing::warn;

/// [`EnvironmentPort`] backed by `std::env`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a new process environment adapter
    pub const fn new() -> Self {
        Self
    }
}

impl EnvironmentPort for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        match env::var(name) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                warn!(env_var = %name, "Ignoring environment variable with invalid UTF-8");
                None
            },
        }
    }
}
