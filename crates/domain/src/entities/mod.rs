//! Domain entities - Objects with identity and lifecycle

mod failure_rule;
mod fault_point;

pub use failure_rule::FailureRule;
pub use fault_point::{AttemptOutcome, FaultPoint};
