use axum::{
    extract::State,
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::SpeechRequest;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Synthesize speech for an OpenAI-style request
///
/// # Returns
/// * `200 OK` - WAV audio with `x-sample-rate` and `x-voice-id` headers
/// * `400 Bad Request` - Empty input or invalid speed
/// * `500 Internal Server Error` - The loaded model failed to produce audio
pub async fn speech_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeechRequest>,
) -> AppResult<Response> {
    let request_id = uuid::Uuid::new_v4();
    let synthesizer = state.synthesizer.clone();

    let result = tokio::task::spawn_blocking(move || synthesizer.handle(&request))
        .await
        .map_err(|e| {
            error!(%request_id, "Synthesis task failed: {}", e);
            AppError::InternalServerError(format!("Synthesis task failed: {e}"))
        })??;

    info!(
        %request_id,
        "Speech synthesized - {} bytes, {} samples, voice {}{}",
        result.audio.len(),
        result.sample_count,
        result.voice_id,
        if result.degraded { " (degraded)" } else { "" }
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.media_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=speech.wav".to_string(),
            ),
            (
                HeaderName::from_static("x-sample-rate"),
                result.sample_rate.to_string(),
            ),
            (HeaderName::from_static("x-voice-id"), result.voice_id),
        ],
        result.audio,
    )
        .into_response())
}
