//! Initialization helpers for preparing runtime assets before starting the
//! speech server.
//!
//! This module hosts the logic that powers the `tts-gateway init` CLI command. The
//! command downloads and caches the Kokoro model and the style files of every
//! configured voice so that regular server startups do not perform network fetches.
//!
//! Typical usage from the CLI:
//!
//! ```text
//! $ CACHE_PATH=/app/cache tts-gateway init
//! ```

use anyhow::Result;

use crate::config::ServerConfig;
use crate::core::model::kokoro::assets;
use crate::core::{ModelBackend, VoiceRegistry};

/// Download and prepare all assets required for runtime execution.
pub async fn run(config: &ServerConfig) -> Result<()> {
    if config.model.backend == ModelBackend::None {
        tracing::info!("Model backend is 'none', nothing to download");
        return Ok(());
    }

    let voices = VoiceRegistry::with_overrides(&config.voice_presets);
    let voice_ids = voices.model_voice_ids();

    tracing::info!(
        "Preparing Kokoro assets for {} voice(s) using cache path: {:?}",
        voice_ids.len(),
        config.model.cache_path
    );
    assets::download_assets(&config.model, &voice_ids).await?;

    tracing::info!("Kokoro assets downloaded successfully");

    Ok(())
}
