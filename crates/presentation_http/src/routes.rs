//! Route definitions

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::{error::ApiError, handlers, state::AppState};

/// Create the control router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Query-string control API
        .route("/status", get(handlers::faults::status))
        .route("/set", post(handlers::faults::set_failures))
        .route("/set-nth", post(handlers::faults::set_nth_failure))
        .route("/reset", post(handlers::faults::reset))
        // JSON control API
        .route(
            "/faults",
            get(handlers::faults::list_faults).post(handlers::faults::create_fault),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // Attach state
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
