//! Speech endpoint tests
//!
//! Drives `/v1/audio/speech` through the router with in-process models.

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use tts_gateway::{
    ChunkIter, ModelAdapter, ModelError, SAMPLE_RATE, SampleBuffer, ServerConfig, SpeechModel,
    VoiceRegistry, routes, state::AppState,
};

type Calls = Arc<Mutex<Vec<(String, String, f32)>>>;

/// Produces one second of a 440 Hz tone per request
struct ToneModel {
    calls: Calls,
}

impl SpeechModel for ToneModel {
    fn generate<'a>(&'a self, text: &'a str, voice_id: &'a str, speed: f32) -> ChunkIter<'a> {
        self.calls
            .lock()
            .push((text.to_string(), voice_id.to_string(), speed));
        let tone: SampleBuffer = (0..SAMPLE_RATE)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SAMPLE_RATE as f32).sin())
            .collect();
        Box::new(std::iter::once(Ok::<_, ModelError>(tone)))
    }
}

/// Yields no chunks at all
struct MuteModel;

impl SpeechModel for MuteModel {
    fn generate<'a>(&'a self, _text: &'a str, _voice_id: &'a str, _speed: f32) -> ChunkIter<'a> {
        Box::new(std::iter::empty::<Result<SampleBuffer, ModelError>>())
    }
}

/// Fails on the first chunk
struct BrokenModel;

impl SpeechModel for BrokenModel {
    fn generate<'a>(&'a self, _text: &'a str, _voice_id: &'a str, _speed: f32) -> ChunkIter<'a> {
        Box::new(std::iter::once(Err(ModelError::Inference(
            "onnx runtime exploded".to_string(),
        ))))
    }
}

fn app_with(model: ModelAdapter) -> Router {
    let state = AppState::from_parts(ServerConfig::default(), VoiceRegistry::builtin(), model);
    routes::api::create_api_router().with_state(state)
}

fn tone_app() -> (Router, Calls) {
    let calls = Calls::default();
    let model = ModelAdapter::with_model(
        "Kokoro-82M",
        Box::new(ToneModel {
            calls: calls.clone(),
        }),
    );
    (app_with(model), calls)
}

fn speech_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/audio/speech")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_speech_with_loaded_model() {
    let (app, calls) = tone_app();

    let response = app
        .oneshot(speech_request(json!({"input": "Hello world", "voice": "male"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "audio/wav");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "inline; filename=speech.wav"
    );
    assert_eq!(headers["x-sample-rate"], "24000");
    assert_eq!(headers["x-voice-id"], "am_michael");

    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[0..4], b"RIFF");

    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 24000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.channels, 1);
    assert_eq!(reader.len(), 24000);

    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Hello world");
    assert_eq!(calls[0].1, "am_michael");
    assert_eq!(calls[0].2, 1.0);
}

#[tokio::test]
async fn test_speech_with_unloaded_model_returns_silence() {
    let app = app_with(ModelAdapter::new("Kokoro-82M"));

    let response = app
        .oneshot(speech_request(json!({"model": "kokoro", "input": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;

    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.len(), 12000);
    assert!(reader.samples::<i16>().all(|s| s.unwrap() == 0));
}

#[tokio::test]
async fn test_empty_input_is_bad_request() {
    for input in ["", "   "] {
        let (app, calls) = tone_app();

        let response = app
            .oneshot(speech_request(json!({"input": input})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["detail"], "Input text is required");
        assert!(calls.lock().is_empty());
    }
}

#[tokio::test]
async fn test_missing_input_is_bad_request() {
    let (app, _) = tone_app();

    let response = app
        .oneshot(speech_request(json!({"voice": "female"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_speed_is_bad_request() {
    let (app, calls) = tone_app();

    let response = app
        .oneshot(speech_request(json!({"input": "hi", "speed": -2.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn test_speed_reaches_model_unchanged() {
    let (app, calls) = tone_app();

    let response = app
        .oneshot(speech_request(json!({"input": "hi", "speed": 5.0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.lock()[0].2, 5.0);
}

#[tokio::test]
async fn test_unknown_voice_uses_default() {
    let (app, calls) = tone_app();

    let response = app
        .oneshot(speech_request(json!({"input": "hi", "voice": "pirate"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-voice-id"], "af_heart");
    assert_eq!(calls.lock()[0].1, "af_heart");
}

#[tokio::test]
async fn test_empty_generation_is_server_error() {
    let app = app_with(ModelAdapter::with_model("Kokoro-82M", Box::new(MuteModel)));

    let response = app
        .oneshot(speech_request(json!({"input": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["detail"], "No audio generated");
}

#[tokio::test]
async fn test_generation_error_is_server_error() {
    let app = app_with(ModelAdapter::with_model("Kokoro-82M", Box::new(BrokenModel)));

    let response = app
        .oneshot(speech_request(json!({"input": "hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("onnx runtime exploded")
    );
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (app, calls) = tone_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/audio/speech")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn test_health_reports_loaded_model() {
    let (app, _) = tone_app();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model_state"], "loaded");
}
