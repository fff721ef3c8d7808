use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::core::VoiceList;
use crate::state::AppState;

/// List the configured voice aliases and the model voices they map to
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoiceList> {
    Json(state.capabilities.voices())
}
