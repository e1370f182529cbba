//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP control server settings
//! - `environments`: environment classification lists
//! - `spec`: fault spec applied at start-up
//!
//! Logging settings live in [`crate::telemetry`].

mod environments;
mod server;
mod spec;

use std::path::Path;
use std::sync::Arc;

use application::FaultInjector;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::ProcessEnvironment;
use crate::spec_loader::{FaultSpec, SpecError, load_spec};
use crate::telemetry::LoggingConfig;

pub use environments::EnvironmentsConfig;
pub use server::ServerConfig;
pub use spec::SpecAppConfig;

/// Prefix of configuration environment variables (e.g., `FAULTGATE_SERVER__PORT`)
pub const ENV_PREFIX: &str = "FAULTGATE";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP control server
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Environment classification lists
    #[serde(default)]
    pub environments: EnvironmentsConfig,

    /// Start-up fault spec
    #[serde(default)]
    pub spec: SpecAppConfig,
}

impl AppConfig {
    /// Load configuration from `faultgate.toml` (optional) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default
    /// `faultgate.toml` (optional), then environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("faultgate").required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., FAULTGATE_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("environments.allowed")
                    .with_list_parse_key("environments.production")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Build an injector reading the process environment with the
    /// configured classification lists
    pub fn build_injector(&self) -> Arc<FaultInjector> {
        Arc::new(FaultInjector::with_lists(
            Arc::new(ProcessEnvironment::new()),
            self.environments.to_lists(),
        ))
    }

    /// Rules to install at start-up
    ///
    /// The `FI_FAILURE_COUNTS` seed (when enabled) comes first; entries of
    /// the spec file override it key by key.
    pub fn startup_spec(&self) -> Result<FaultSpec, SpecError> {
        let mut combined = if self.spec.seed_from_env {
            FaultSpec::from_env(&ProcessEnvironment::new()).unwrap_or_default()
        } else {
            FaultSpec::default()
        };

        if let Some(path) = &self.spec.path {
            let file = load_spec(path)?;
            for (key, count) in file.failures {
                combined.precise_failures.remove(&key);
                combined.failures.insert(key, count);
            }
            for (key, n) in file.precise_failures {
                combined.failures.remove(&key);
                combined.precise_failures.insert(key, n);
            }
        }

        info!(
            seed_from_env = self.spec.seed_from_env,
            path = ?self.spec.path,
            rules = combined.failures.len() + combined.precise_failures.len(),
            "Start-up fault spec resolved"
        );
        Ok(combined)
    }
}
