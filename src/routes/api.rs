use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, speech, voices};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// The liveness route `/` is added by [`crate::app::build_app`].
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(api::health))
        .route("/v1/voices", get(voices::list_voices))
        .route("/v1/audio/speech", post(speech::speech_handler))
        .layer(TraceLayer::new_for_http())
}
