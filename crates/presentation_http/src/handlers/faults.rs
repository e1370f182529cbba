//! Fault control handlers
//!
//! Query-string endpoints (`/set`, `/set-nth`, `/reset`, `/status`) plus a
//! JSON resource at `/faults`. Rule changes made while the injector is in a
//! production-like environment are accepted and silently ignored.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use domain::{FaultStatus, RuleSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Plain-text acknowledgement of a control request
pub const OK_BODY: &str = "OK";

/// Query of `/set`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetFailuresQuery {
    pub key: Option<String>,
    pub count: Option<String>,
}

/// Query of `/set-nth`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetNthQuery {
    pub key: Option<String>,
    pub n: Option<String>,
}

/// Body of `POST /faults`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultRequest {
    pub key: String,
    pub count: i64,
    /// Install an Nth-only rule instead of first-N
    #[serde(default)]
    pub precise: bool,
}

fn require_key(key: Option<String>) -> Result<String, ApiError> {
    key.filter(|k| !k.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing fault key".to_string()))
}

/// Lenient integer parsing: missing or unparsable values become 0
fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// `POST /set?key=K&count=N`
pub async fn set_failures(
    State(state): State<AppState>,
    Query(query): Query<SetFailuresQuery>,
) -> Result<&'static str, ApiError> {
    let key = require_key(query.key)?;
    let count = parse_count(query.count.as_deref());
    debug!(key = %key, count, "Control request: set failures");
    state.injector.set_failures(&key, count);
    Ok(OK_BODY)
}

/// `POST /set-nth?key=K&n=N`
pub async fn set_nth_failure(
    State(state): State<AppState>,
    Query(query): Query<SetNthQuery>,
) -> Result<&'static str, ApiError> {
    let key = require_key(query.key)?;
    let n = parse_count(query.n.as_deref());
    debug!(key = %key, n, "Control request: set nth failure");
    state.injector.set_nth_failure(&key, n);
    Ok(OK_BODY)
}

/// `POST /reset`
pub async fn reset(State(state): State<AppState>) -> &'static str {
    state.injector.reset();
    OK_BODY
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<FaultStatus> {
    Json(state.injector.status())
}

/// `GET /faults`
pub async fn list_faults(State(state): State<AppState>) -> Json<RuleSnapshot> {
    Json(state.injector.rules())
}

/// `POST /faults`
///
/// Responds with the configured rules after the change.
pub async fn create_fault(
    State(state): State<AppState>,
    payload: Result<Json<FaultRequest>, JsonRejection>,
) -> Result<Json<RuleSnapshot>, ApiError> {
    let Json(request) = payload?;
    let key = require_key(Some(request.key))?;

    if request.precise {
        state.injector.set_nth_failure(&key, request.count);
    } else {
        state.injector.set_failures(&key, request.count);
    }

    Ok(Json(state.injector.rules()))
}
