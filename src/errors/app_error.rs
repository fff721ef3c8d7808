use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::core::SpeechError;

/// Application error type
///
/// Bodies use the `{"detail": ...}` shape OpenAI-style clients expect.
#[derive(Debug)]
pub enum AppError {
    InternalServerError(String),
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                msg
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                msg
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "Internal server error: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Validation(msg) => AppError::BadRequest(msg),
            SpeechError::Synthesis(failure) => AppError::InternalServerError(failure.0),
            SpeechError::Encoding(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
