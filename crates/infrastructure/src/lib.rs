//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the process environment adapter, configuration loading,
//! the YAML fault spec loader and logging setup.

pub mod adapters;
pub mod config;
pub mod spec_loader;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, EnvironmentsConfig, ServerConfig, SpecAppConfig};
pub use spec_loader::{FAILURE_COUNTS_ENV, FaultSpec, SpecError, load_and_apply, load_spec};
pub use telemetry::{LogFormat, LogTarget, LoggingConfig, TelemetryError, init_logging};
