//! `GET /health`: liveness of the bridge itself.
//!
//! The wrapped executable is not probed here; `claude_code_status` does that.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server answers.
    pub status: String,
    /// ccbridge version.
    pub version: String,
    /// Executable that queries are sent to.
    pub program: String,
    /// Model used when a query names none.
    pub default_model: String,
    /// Concurrent query limit, absent when unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let bridge = state.handler.adapter().config();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        program: bridge.program.clone(),
        default_model: bridge.default_model.clone(),
        max_concurrent: bridge.max_concurrent,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
