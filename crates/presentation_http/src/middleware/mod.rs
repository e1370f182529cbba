//! HTTP middleware components

pub mod fault_injection;

pub use fault_injection::{
    FaultInjectionLayer, FaultInjectionService, INJECTED_FAILURE_BODY, ResponseFactory,
};
