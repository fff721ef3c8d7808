//! Kokoro asset management - downloading and caching

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{error, info};

use crate::core::model::ModelConfig;

const MODEL_FILENAME: &str = "kokoro-v1.0.onnx";
const VOICES_DIRNAME: &str = "voices";

/// Download the model and the given voices if not already cached
pub async fn download_assets(config: &ModelConfig, voice_ids: &[&str]) -> Result<()> {
    let model_path = download_model(config).await?;
    info!("Kokoro model ready at: {:?}", model_path);

    let voices_dir = download_voices(config, voice_ids).await?;
    info!("Kokoro voices ready in: {:?}", voices_dir);

    Ok(())
}

/// Ensure the model exists locally, downloading it when missing
pub async fn download_model(config: &ModelConfig) -> Result<PathBuf> {
    if let Some(model_path) = &config.model_path {
        if model_path.exists() {
            info!("Using configured Kokoro model at: {:?}", model_path);
            return Ok(model_path.clone());
        }

        error!(
            "Configured Kokoro model path {:?} is missing or unreadable",
            model_path
        );
        anyhow::bail!("Configured model path {:?} does not exist", model_path);
    }

    let cache_dir = config.get_cache_dir()?;
    fs::create_dir_all(&cache_dir).await?;
    let model_path = cache_dir.join(MODEL_FILENAME);

    if model_path.exists() {
        info!("Using cached Kokoro model at: {:?}", model_path);
        return Ok(model_path);
    }

    let model_url = config
        .model_url
        .as_ref()
        .context("No model URL specified and model not found locally")?;

    info!("Downloading Kokoro model from: {}", model_url);
    download_file(model_url, &model_path).await?;

    Ok(model_path)
}

/// Ensure every requested voice style file exists locally
pub async fn download_voices(config: &ModelConfig, voice_ids: &[&str]) -> Result<PathBuf> {
    let dir = match &config.voices_path {
        Some(dir) => dir.clone(),
        None => config.get_cache_dir()?.join(VOICES_DIRNAME),
    };
    fs::create_dir_all(&dir).await?;

    let base_url = config.voices_url.as_deref().map(|u| u.trim_end_matches('/'));

    for voice_id in voice_ids {
        let path = dir.join(format!("{voice_id}.bin"));
        if path.exists() {
            info!("Using cached voice '{}' at: {:?}", voice_id, path);
            continue;
        }

        let base_url = base_url.with_context(|| {
            format!("No voices URL specified and voice '{voice_id}' not found locally")
        })?;
        let url = format!("{base_url}/{voice_id}.bin");
        info!("Downloading voice '{}' from: {}", voice_id, url);
        download_file(&url, &path).await?;
    }

    Ok(dir)
}

/// Resolve the expected on-disk location of the model without downloading it
pub fn model_path(config: &ModelConfig) -> Result<PathBuf> {
    if let Some(model_path) = &config.model_path {
        if model_path.exists() {
            return Ok(model_path.clone());
        }

        anyhow::bail!(
            "Kokoro model not found at configured path {:?}. Run `tts-gateway init` first.",
            model_path
        );
    }

    let model_path = config.get_cache_dir()?.join(MODEL_FILENAME);

    if model_path.exists() {
        Ok(model_path)
    } else {
        anyhow::bail!(
            "Kokoro model missing at {:?}. Run `tts-gateway init` before starting the server.",
            model_path
        );
    }
}

/// Resolve the directory holding voice style files without downloading
pub fn voices_dir(config: &ModelConfig) -> Result<PathBuf> {
    let dir = match &config.voices_path {
        Some(dir) => dir.clone(),
        None => config.get_cache_dir()?.join(VOICES_DIRNAME),
    };

    if !dir.is_dir() {
        anyhow::bail!(
            "Voice directory {:?} not found. Run `tts-gateway init` first.",
            dir
        );
    }

    Ok(dir)
}

async fn download_file(url: &str, path: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Failed to download {}: HTTP {}", url, response.status());
    }

    let bytes = response.bytes().await?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    info!(
        "Downloaded {} bytes to {:?} (sha256 {:x})",
        bytes.len(),
        path,
        hasher.finalize()
    );

    fs::write(path, bytes).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_model_path_not_configured() {
        let config = ModelConfig::default();
        assert!(model_path(&config).is_err());
    }

    #[test]
    fn test_model_path_with_cache() {
        let temp_dir = tempdir().unwrap();
        let cache_path = temp_dir.path().to_path_buf();

        let config = ModelConfig {
            cache_path: Some(cache_path.clone()),
            ..Default::default()
        };

        let kokoro_dir = cache_path.join("kokoro");
        std::fs::create_dir_all(&kokoro_dir).unwrap();
        let model_file = kokoro_dir.join(MODEL_FILENAME);
        std::fs::write(&model_file, b"fake model data").unwrap();

        assert_eq!(model_path(&config).unwrap(), model_file);
    }

    #[test]
    fn test_configured_model_path_must_exist() {
        let config = ModelConfig {
            model_path: Some(PathBuf::from("/nonexistent/kokoro.onnx")),
            ..Default::default()
        };
        assert!(model_path(&config).is_err());
    }

    #[test]
    fn test_voices_dir_prefers_configured_path() {
        let temp_dir = tempdir().unwrap();
        let config = ModelConfig {
            voices_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(voices_dir(&config).unwrap(), temp_dir.path());
    }

    #[tokio::test]
    async fn test_download_voices_skips_cached_files() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("af_heart.bin"), b"cached").unwrap();

        // No URL configured, so anything not cached would fail
        let config = ModelConfig {
            voices_path: Some(temp_dir.path().to_path_buf()),
            voices_url: None,
            ..Default::default()
        };

        let dir = download_voices(&config, &["af_heart"]).await.unwrap();
        assert_eq!(dir, temp_dir.path());
        assert!(download_voices(&config, &["am_michael"]).await.is_err());
    }
}
