//! faultgate HTTP presentation layer
//!
//! This crate provides the control API for a shared [`application::FaultInjector`]
//! and a tower middleware that injects failures into HTTP services.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::ApiError;
pub use middleware::{
    FaultInjectionLayer, FaultInjectionService, INJECTED_FAILURE_BODY, ResponseFactory,
};
pub use routes::create_router;
pub use shutdown::{ShutdownOutcome, serve_with_shutdown, shutdown_signal};
pub use state::AppState;
