//! Speech request pipeline
//!
//! Validates a request, resolves the voice alias, synthesizes through the
//! [`ModelAdapter`] and wraps the samples in a WAV container.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::audio::{EncodeError, SAMPLE_RATE, WAV_MEDIA_TYPE, encode_wav};
use super::model::{ModelAdapter, SynthesisFailure};
use super::voices::{DEFAULT_VOICE, VoiceRegistry};

/// Characters of input text included in log lines
pub const TEXT_PREVIEW_CHARS: usize = 80;

/// OpenAI-compatible speech request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Model name; accepted for compatibility, a single model is served
    #[serde(default)]
    pub model: Option<String>,
    /// Text to synthesize
    #[serde(default, alias = "text")]
    pub input: String,
    /// Voice alias, `default` when omitted
    #[serde(default)]
    pub voice: Option<String>,
    /// Requested container; only WAV is produced
    #[serde(default)]
    pub response_format: Option<String>,
    /// Speaking rate multiplier, 1.0 when omitted
    #[serde(default)]
    pub speed: Option<f32>,
}

impl SpeechRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }
}

/// Encoded audio plus the metadata needed to answer the request
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub media_type: &'static str,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub voice_id: String,
    /// True when the audio is the silent fallback of an unloaded model
    pub degraded: bool,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Synthesis(#[from] SynthesisFailure),
    #[error("Audio encoding failed: {0}")]
    Encoding(#[from] EncodeError),
}

/// Coordinates the voice registry, model and encoder for one request
#[derive(Debug, Clone)]
pub struct SpeechSynthesizer {
    voices: Arc<VoiceRegistry>,
    model: Arc<ModelAdapter>,
}

impl SpeechSynthesizer {
    pub fn new(voices: Arc<VoiceRegistry>, model: Arc<ModelAdapter>) -> Self {
        Self { voices, model }
    }

    pub fn voices(&self) -> &Arc<VoiceRegistry> {
        &self.voices
    }

    /// Run the full pipeline for a request.
    ///
    /// Blocking: callers on an async runtime should move this onto the
    /// blocking pool.
    pub fn handle(&self, request: &SpeechRequest) -> Result<SynthesisResult, SpeechError> {
        let text = request.input.trim();
        if text.is_empty() {
            return Err(SpeechError::Validation("Input text is required".to_string()));
        }

        let speed = validate_speed(request.speed)?;

        if let Some(format) = request.response_format.as_deref() {
            if !format.eq_ignore_ascii_case("wav") {
                debug!("response_format '{}' requested, returning wav", format);
            }
        }

        let voice_name = request.voice.as_deref().unwrap_or(DEFAULT_VOICE);
        if !self.voices.contains(voice_name) {
            debug!("Unknown voice '{}', using default", voice_name);
        }
        let voice_id = self.voices.resolve(voice_name).to_string();

        info!(
            "Synthesizing '{}' with voice {} ({}) at speed {}",
            text_preview(text, TEXT_PREVIEW_CHARS),
            voice_name,
            voice_id,
            speed
        );

        let degraded = !self.model.is_ready();
        if degraded {
            warn!("Model not loaded, returning silence");
        }

        let samples = self.model.synthesize(text, &voice_id, speed)?;
        let sample_count = samples.len();
        let audio = encode_wav(&samples, SAMPLE_RATE)?;

        Ok(SynthesisResult {
            audio,
            media_type: WAV_MEDIA_TYPE,
            sample_rate: SAMPLE_RATE,
            sample_count,
            voice_id,
            degraded,
        })
    }
}

/// Speed defaults to 1.0; anything non-finite or non-positive is rejected
fn validate_speed(speed: Option<f32>) -> Result<f32, SpeechError> {
    let speed = speed.unwrap_or(1.0);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(SpeechError::Validation(format!(
            "Speed must be a positive number, got {speed}"
        )));
    }
    Ok(speed)
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn text_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::SampleBuffer;
    use crate::core::model::{ChunkIter, SpeechModel};
    use parking_lot::Mutex;

    /// One second of 440 Hz per call, recording the arguments it saw
    struct ToneModel {
        seen: Arc<Mutex<Vec<(String, String, f32)>>>,
    }

    impl SpeechModel for ToneModel {
        fn generate<'a>(&'a self, text: &'a str, voice_id: &'a str, speed: f32) -> ChunkIter<'a> {
            self.seen
                .lock()
                .push((text.to_string(), voice_id.to_string(), speed));
            let tone: SampleBuffer = (0..SAMPLE_RATE)
                .map(|i| {
                    (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SAMPLE_RATE as f32).sin() * 0.5
                })
                .collect();
            Box::new(std::iter::once(Ok::<_, crate::core::model::ModelError>(tone)))
        }
    }

    type Seen = Arc<Mutex<Vec<(String, String, f32)>>>;

    fn loaded() -> (SpeechSynthesizer, Seen) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model = ModelAdapter::with_model("test", Box::new(ToneModel { seen: seen.clone() }));
        let synthesizer =
            SpeechSynthesizer::new(Arc::new(VoiceRegistry::builtin()), Arc::new(model));
        (synthesizer, seen)
    }

    fn unloaded() -> SpeechSynthesizer {
        SpeechSynthesizer::new(
            Arc::new(VoiceRegistry::builtin()),
            Arc::new(ModelAdapter::new("test")),
        )
    }

    #[test]
    fn test_loaded_model_produces_wav() {
        let (synthesizer, seen) = loaded();
        let result = synthesizer
            .handle(&SpeechRequest::new("Hello world").with_voice("male"))
            .unwrap();

        assert_eq!(result.media_type, "audio/wav");
        assert_eq!(result.sample_rate, 24000);
        assert_eq!(result.sample_count, 24000);
        assert_eq!(result.voice_id, "am_michael");
        assert!(!result.degraded);
        assert_eq!(&result.audio[0..4], b"RIFF");
        assert_eq!(result.audio.len(), 44 + 24000 * 2);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ("Hello world".to_string(), "am_michael".to_string(), 1.0));
    }

    #[test]
    fn test_empty_input_rejected_before_model() {
        let (synthesizer, seen) = loaded();
        for input in ["", "   ", "\n\t"] {
            let err = synthesizer.handle(&SpeechRequest::new(input)).unwrap_err();
            assert!(matches!(err, SpeechError::Validation(_)));
        }
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_input_is_trimmed() {
        let (synthesizer, seen) = loaded();
        synthesizer.handle(&SpeechRequest::new("  hi there  ")).unwrap();
        assert_eq!(seen.lock()[0].0, "hi there");
    }

    #[test]
    fn test_unknown_voice_uses_default() {
        let (synthesizer, seen) = loaded();
        let result = synthesizer
            .handle(&SpeechRequest::new("hello").with_voice("robot"))
            .unwrap();
        assert_eq!(result.voice_id, "af_heart");
        assert_eq!(seen.lock()[0].1, "af_heart");
    }

    #[test]
    fn test_speed_validation_and_passthrough() {
        let (synthesizer, seen) = loaded();

        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = synthesizer
                .handle(&SpeechRequest::new("hello").with_speed(bad))
                .unwrap_err();
            assert!(matches!(err, SpeechError::Validation(_)));
        }

        synthesizer
            .handle(&SpeechRequest::new("hello").with_speed(10.0))
            .unwrap();
        synthesizer
            .handle(&SpeechRequest::new("hello").with_speed(0.1))
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen[0].2, 10.0);
        assert_eq!(seen[1].2, 0.1);
    }

    #[test]
    fn test_unloaded_model_returns_silence() {
        let result = unloaded().handle(&SpeechRequest::new("hello")).unwrap();
        assert!(result.degraded);
        assert_eq!(result.sample_count, 12000);
        assert!(result.audio[44..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_non_wav_format_still_wav() {
        let (synthesizer, _) = loaded();
        let mut request = SpeechRequest::new("hello");
        request.response_format = Some("mp3".to_string());

        let result = synthesizer.handle(&request).unwrap();
        assert_eq!(result.media_type, "audio/wav");
    }

    #[test]
    fn test_request_deserialization() {
        let request: SpeechRequest =
            serde_json::from_str(r#"{"model":"tts-1","input":"hi","voice":"male","speed":1.5}"#)
                .unwrap();
        assert_eq!(request.input, "hi");
        assert_eq!(request.voice.as_deref(), Some("male"));
        assert_eq!(request.speed, Some(1.5));

        let request: SpeechRequest = serde_json::from_str(r#"{"text":"legacy"}"#).unwrap();
        assert_eq!(request.input, "legacy");

        let request: SpeechRequest = serde_json::from_str("{}").unwrap();
        assert!(request.input.is_empty());
    }

    #[test]
    fn test_text_preview() {
        assert_eq!(text_preview("short", 80), "short");

        let long = "a".repeat(100);
        let preview = text_preview(&long, 80);
        assert_eq!(preview.len(), 83);
        assert!(preview.ends_with("..."));

        // Multi-byte characters are cut on a char boundary
        let accented = "é".repeat(90);
        assert_eq!(text_preview(&accented, 80).chars().count(), 83);

        let exact = "b".repeat(80);
        assert_eq!(text_preview(&exact, 80), exact);
    }
}
