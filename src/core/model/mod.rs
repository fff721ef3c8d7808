//! Speech model lifecycle
//!
//! The [`ModelAdapter`] owns the single model instance of the process. It is
//! initialized once before the server starts listening and never changes
//! state afterwards:
//!
//! ```text
//! Unloaded ──initialize──► Loaded
//!     │
//!     └──────initialize──► FailedToLoad(reason)
//! ```
//!
//! While no model is loaded, synthesis degrades to a short silent buffer so
//! clients keep receiving valid audio.
//!
//! # Feature Flag
//!
//! The Kokoro ONNX backend requires the `kokoro` feature. Without it, selecting
//! that backend records a load failure and the adapter runs degraded.

pub mod config;
pub mod kokoro;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::audio::{SAMPLE_RATE, SampleBuffer, silence};

pub use config::{DEFAULT_MODEL_LABEL, ModelBackend, ModelConfig};

/// Length of the fallback buffer returned while no model is loaded
pub const SILENCE_DURATION_MS: u32 = 500;

/// Lazily produced audio chunks, one per text segment
pub type ChunkIter<'a> = Box<dyn Iterator<Item = Result<SampleBuffer, ModelError>> + Send + 'a>;

/// Errors raised by a model while generating audio
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Phonemization failed: {0}")]
    Phonemization(String),
    #[error("Voice '{0}' is not available")]
    UnknownVoice(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A synthesis attempt on a loaded model that produced no usable audio
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SynthesisFailure(pub String);

/// A loaded text-to-speech model.
///
/// `generate` is expected to split `text` into newline-separated segments and
/// yield one chunk of 24 kHz samples per segment. Chunks are pulled lazily, so
/// an implementation may do the heavy work inside `next()`.
pub trait SpeechModel: Send + Sync {
    fn generate<'a>(&'a self, text: &'a str, voice_id: &'a str, speed: f32) -> ChunkIter<'a>;
}

/// Split text on runs of newlines, skipping blank segments
pub fn split_segments(text: &str) -> impl Iterator<Item = &str> + Send + '_ {
    text.split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Lifecycle state of the process-wide model
pub enum ModelState {
    Unloaded,
    Loaded(Box<dyn SpeechModel>),
    FailedToLoad(String),
}

impl ModelState {
    pub fn label(&self) -> &'static str {
        match self {
            ModelState::Unloaded => "unloaded",
            ModelState::Loaded(_) => "loaded",
            ModelState::FailedToLoad(_) => "failed",
        }
    }
}

impl fmt::Debug for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelState::Unloaded => write!(f, "Unloaded"),
            ModelState::Loaded(_) => write!(f, "Loaded(..)"),
            ModelState::FailedToLoad(reason) => f.debug_tuple("FailedToLoad").field(reason).finish(),
        }
    }
}

/// Snapshot of the adapter for health reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescription {
    pub loaded: bool,
    pub model_label: String,
    pub state: &'static str,
    pub error: Option<String>,
}

/// Owner of the model and its load state
pub struct ModelAdapter {
    label: String,
    state: ModelState,
}

impl ModelAdapter {
    /// Create an adapter with no model loaded
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: ModelState::Unloaded,
        }
    }

    /// Create an adapter around an already constructed model
    pub fn with_model(label: impl Into<String>, model: Box<dyn SpeechModel>) -> Self {
        Self {
            label: label.into(),
            state: ModelState::Loaded(model),
        }
    }

    /// Build and initialize an adapter for the configured backend.
    ///
    /// `voice_ids` lists the model voices that must be available once loaded.
    /// The `none` backend never attempts a load and leaves the adapter unloaded.
    pub fn from_config(config: &ModelConfig, voice_ids: &[&str]) -> Self {
        let mut adapter = Self::new(config.label.clone());
        match config.backend {
            ModelBackend::None => {
                info!("Model backend 'none' selected, serving silence for all requests");
            }
            ModelBackend::Kokoro => adapter.initialize(|| kokoro::load(config, voice_ids)),
        }
        adapter
    }

    /// Attempt to construct the model exactly once.
    ///
    /// Failures are recorded, never raised. A panicking loader counts as a
    /// failure too. Calls after the first are ignored.
    pub fn initialize<F>(&mut self, loader: F)
    where
        F: FnOnce() -> anyhow::Result<Box<dyn SpeechModel>>,
    {
        if !matches!(self.state, ModelState::Unloaded) {
            warn!(
                "Model '{}' already initialized (state: {}), ignoring repeated initialization",
                self.label,
                self.state.label()
            );
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(loader)).unwrap_or_else(|payload| {
            Err(anyhow::anyhow!(
                "loader panicked: {}",
                panic_message(&*payload)
            ))
        });

        match outcome {
            Ok(model) => {
                info!("Model '{}' loaded", self.label);
                self.state = ModelState::Loaded(model);
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(
                    "Failed to load model '{}': {}. Serving silence until restart.",
                    self.label, reason
                );
                self.state = ModelState::FailedToLoad(reason);
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Loaded(_))
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            loaded: self.is_ready(),
            model_label: self.label.clone(),
            state: self.state.label(),
            error: match &self.state {
                ModelState::FailedToLoad(reason) => Some(reason.clone()),
                _ => None,
            },
        }
    }

    /// Synthesize `text` with a model voice.
    ///
    /// Without a loaded model this returns half a second of silence. With one,
    /// all generated chunks are concatenated; a generation error or an empty
    /// result is reported as a [`SynthesisFailure`].
    pub fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        speed: f32,
    ) -> Result<SampleBuffer, SynthesisFailure> {
        let model = match &self.state {
            ModelState::Loaded(model) => model,
            ModelState::Unloaded | ModelState::FailedToLoad(_) => {
                return Ok(silence(SILENCE_DURATION_MS, SAMPLE_RATE));
            }
        };

        let mut samples = SampleBuffer::new();
        for (index, chunk) in model.generate(text, voice_id, speed).enumerate() {
            match chunk {
                Ok(chunk) => samples.extend_from_slice(&chunk),
                Err(e) => {
                    error!(
                        voice_id,
                        speed,
                        chunk = index,
                        text_chars = text.chars().count(),
                        "Speech generation failed: {}",
                        e
                    );
                    return Err(SynthesisFailure(e.to_string()));
                }
            }
        }

        if samples.is_empty() {
            error!(
                voice_id,
                speed,
                text_chars = text.chars().count(),
                "Speech generation produced no audio"
            );
            return Err(SynthesisFailure("No audio generated".to_string()));
        }

        Ok(samples)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("label", &self.label)
            .field("state", &self.state)
            .finish()
    }
}
