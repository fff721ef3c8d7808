use std::sync::Arc;

use tracing::{error, info};

use crate::config::ServerConfig;
use crate::core::{CapabilityReporter, ModelAdapter, SpeechSynthesizer, VoiceRegistry};

/// Application state that can be shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub synthesizer: SpeechSynthesizer,
    pub capabilities: CapabilityReporter,
}

impl AppState {
    /// Build the voice registry and load the model before serving.
    ///
    /// Model loading runs on the blocking pool. A load failure leaves the
    /// server in degraded mode rather than aborting startup.
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let voices = VoiceRegistry::with_overrides(&config.voice_presets);
        info!("Voice aliases: {:?}", voices.list_aliases());

        let model_config = config.model.clone();
        let voice_ids: Vec<String> = voices
            .model_voice_ids()
            .into_iter()
            .map(String::from)
            .collect();

        let model = tokio::task::spawn_blocking(move || {
            let ids: Vec<&str> = voice_ids.iter().map(String::as_str).collect();
            ModelAdapter::from_config(&model_config, &ids)
        })
        .await
        .unwrap_or_else(|e| {
            error!("Model loading task failed: {}", e);
            let mut adapter = ModelAdapter::new(config.model.label.clone());
            adapter.initialize(|| Err(anyhow::anyhow!("model loading task failed: {e}")));
            adapter
        });

        Self::from_parts(config, voices, model)
    }

    /// Assemble state from an already prepared registry and model
    pub fn from_parts(config: ServerConfig, voices: VoiceRegistry, model: ModelAdapter) -> Arc<Self> {
        let voices = Arc::new(voices);
        let model = Arc::new(model);

        Arc::new(Self {
            config,
            synthesizer: SpeechSynthesizer::new(voices.clone(), model.clone()),
            capabilities: CapabilityReporter::new(voices, model),
        })
    }
}
