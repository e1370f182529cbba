//! Application layer - Fault injection decision engine
//!
//! Wraps the domain rules in shared, thread-safe services and defines the
//! ports through which the engine reads its environment.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{DEFAULT_INJECTED_MESSAGE, InjectedError};
pub use ports::*;
pub use services::*;
