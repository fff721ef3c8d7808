//! Speech model configuration types

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default human-readable model label reported by `/health`
pub const DEFAULT_MODEL_LABEL: &str = "Kokoro-82M";

/// Default Kokoro ONNX model download location
pub const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/onnx-community/Kokoro-82M-v1.0-ONNX/resolve/main/onnx/model.onnx";

/// Base URL for per-voice style files; `<voice_id>.bin` is appended
pub const DEFAULT_VOICES_URL: &str =
    "https://huggingface.co/onnx-community/Kokoro-82M-v1.0-ONNX/resolve/main/voices";

/// Synthesis backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Kokoro-82M through ONNX Runtime
    #[default]
    Kokoro,
    /// No model: every request is answered with silence
    None,
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackend::Kokoro => write!(f, "kokoro"),
            ModelBackend::None => write!(f, "none"),
        }
    }
}

impl FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kokoro" => Ok(ModelBackend::Kokoro),
            "none" | "mock" | "silence" => Ok(ModelBackend::None),
            other => Err(format!(
                "Unknown model backend '{other}'. Expected 'kokoro' or 'none'"
            )),
        }
    }
}

/// Configuration for the speech model backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend to load at startup
    pub backend: ModelBackend,

    /// Label reported in health output
    pub label: String,

    /// Path to the ONNX model file (falls back to the cache directory)
    pub model_path: Option<PathBuf>,

    /// Directory holding `<voice_id>.bin` style files (falls back to the cache directory)
    pub voices_path: Option<PathBuf>,

    /// Cache directory for downloaded assets
    pub cache_path: Option<PathBuf>,

    /// URL to download the model from
    pub model_url: Option<String>,

    /// Base URL to download voice style files from
    pub voices_url: Option<String>,

    /// Number of intra-op threads for ONNX inference
    pub num_threads: Option<usize>,

    /// eSpeak language code (`en-us` or `en-gb`)
    pub language: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Kokoro,
            label: DEFAULT_MODEL_LABEL.to_string(),
            model_path: None,
            voices_path: None,
            cache_path: None,
            model_url: Some(DEFAULT_MODEL_URL.to_string()),
            voices_url: Some(DEFAULT_VOICES_URL.to_string()),
            num_threads: None,
            language: "en-us".to_string(),
        }
    }
}

impl ModelConfig {
    /// Get the cache directory for Kokoro assets
    pub fn get_cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = if let Some(cache_path) = &self.cache_path {
            cache_path.join("kokoro")
        } else {
            anyhow::bail!("No cache directory specified for the speech model");
        };
        Ok(cache_dir)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            anyhow::bail!("Model label must not be empty");
        }
        if self.num_threads == Some(0) {
            anyhow::bail!("Model num_threads must be greater than 0");
        }
        if self.backend == ModelBackend::Kokoro {
            super::kokoro::phonemizer::espeak_language(&self.language)?;
        }
        Ok(())
    }
}
