//! Application services
//!
//! The fault injection engine: rule storage, the environment gate, the
//! decision façade and its convenience wrappers.

mod environment_policy;
mod fault_adapters;
mod fault_injector;
mod injection_context;
mod rule_store;

pub use environment_policy::{ENVIRONMENT_VARIABLES, EnvironmentPolicy};
pub use fault_adapters::{with_fault_injection, with_fault_injection_context};
pub use fault_injector::FaultInjector;
pub use injection_context::{CancellationFlag, InjectionContext};
pub use rule_store::RuleStore;
