//! Application state shared across handlers

use std::sync::Arc;

use application::FaultInjector;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Injector controlled by this server
    pub injector: Arc<FaultInjector>,
}

impl AppState {
    pub const fn new(injector: Arc<FaultInjector>) -> Self {
        Self { injector }
    }
}
