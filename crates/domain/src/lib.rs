//! Domain layer for faultgate
//!
//! Failure rules, per-key fault points and environment classification.
//! This layer has no I/O and no locking; the application layer wraps it
//! in shared, thread-safe services.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
