use axum::{extract::State, response::Json};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::HealthReport;
use crate::state::AppState;

/// Liveness check
/// Returns a simple JSON response indicating the server is running
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK"
    }))
}

/// Health and capability report
///
/// Always answers `200`; a missing model shows up as `model_loaded: false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.capabilities.health())
}
