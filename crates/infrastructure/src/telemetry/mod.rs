//! Logging infrastructure

mod logging;

pub use logging::{LogFormat, LogTarget, LoggingConfig, TelemetryError, init_logging};
