//! Value Objects - Immutable, identity-less domain primitives

mod environment;
mod rule_snapshot;

pub use environment::{
    DEFAULT_ALLOWED_ENVIRONMENTS, DEFAULT_PRODUCTION_ENVIRONMENTS, EnvironmentClass,
    EnvironmentLists, EnvironmentName,
};
pub use rule_snapshot::{FaultStatus, RuleSnapshot};
