//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod environment_port;

#[cfg(test)]
pub use environment_port::MockEnvironmentPort;
pub use environment_port::{EnvironmentPort, FixedEnvironment};
