use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::audio::SAMPLE_RATE;
use super::model::ModelAdapter;
use super::voices::VoiceRegistry;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Always `"ok"` while the process serves requests, even when degraded
    pub status: String,
    pub model: String,
    pub model_loaded: bool,
    pub model_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
    pub sample_rate: u32,
    pub available_voices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    pub description: String,
}

/// Body of `GET /v1/voices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceList {
    pub voices: Vec<VoiceInfo>,
}

/// Read-only view of model and voice state
#[derive(Debug, Clone)]
pub struct CapabilityReporter {
    voices: Arc<VoiceRegistry>,
    model: Arc<ModelAdapter>,
}

impl CapabilityReporter {
    pub fn new(voices: Arc<VoiceRegistry>, model: Arc<ModelAdapter>) -> Self {
        Self { voices, model }
    }

    pub fn health(&self) -> HealthReport {
        let description = self.model.describe();
        HealthReport {
            status: "ok".to_string(),
            model: description.model_label,
            model_loaded: description.loaded,
            model_state: description.state.to_string(),
            model_error: description.error,
            sample_rate: SAMPLE_RATE,
            available_voices: self
                .voices
                .list_aliases()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn voices(&self) -> VoiceList {
        VoiceList {
            voices: self
                .voices
                .descriptors()
                .iter()
                .map(|d| VoiceInfo {
                    id: d.alias.clone(),
                    description: d.model_voice_id.clone(),
                })
                .collect(),
        }
    }
}
