//! Voice style embeddings
//!
//! Each voice is stored as `<voice_id>.bin`: raw little-endian `f32` values
//! shaped `[N, 1, 256]`. Row `n` conditions a sequence of `n` phoneme tokens.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::model::ModelError;

/// Width of a single style embedding row
pub const STYLE_DIM: usize = 256;

/// Style embeddings for one voice
#[derive(Debug, Clone)]
pub struct VoiceStyle {
    rows: Vec<f32>,
}

impl VoiceStyle {
    pub fn from_bytes(voice_id: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % (4 * STYLE_DIM) != 0 {
            anyhow::bail!(
                "Voice file for '{}' has {} bytes, expected a non-empty multiple of {}",
                voice_id,
                bytes.len(),
                4 * STYLE_DIM
            );
        }

        let rows = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() / STYLE_DIM
    }

    /// Embedding for a sequence of `token_count` tokens, clamped to the last row
    pub fn embedding(&self, token_count: usize) -> &[f32] {
        let row = token_count.min(self.row_count() - 1);
        &self.rows[row * STYLE_DIM..(row + 1) * STYLE_DIM]
    }
}

/// Loaded voices keyed by model voice id
#[derive(Debug, Default)]
pub struct VoiceStyles {
    styles: HashMap<String, VoiceStyle>,
}

impl VoiceStyles {
    /// Load the requested voices from `dir`.
    ///
    /// Missing or malformed files are skipped with a warning; at least one
    /// voice must load.
    pub fn load_dir(dir: &Path, voice_ids: &[&str]) -> Result<Self> {
        let mut styles = HashMap::new();

        for voice_id in voice_ids {
            let path = dir.join(format!("{voice_id}.bin"));
            let loaded = std::fs::read(&path)
                .with_context(|| format!("Failed to read voice file {}", path.display()))
                .and_then(|bytes| VoiceStyle::from_bytes(voice_id, &bytes));

            match loaded {
                Ok(style) => {
                    debug!("Loaded voice '{}' ({} rows)", voice_id, style.row_count());
                    styles.insert(voice_id.to_string(), style);
                }
                Err(e) => warn!("Skipping voice '{}': {:#}", voice_id, e),
            }
        }

        if styles.is_empty() {
            anyhow::bail!(
                "No voice style files could be loaded from {}. Run `tts-gateway init` first.",
                dir.display()
            );
        }

        Ok(Self { styles })
    }

    pub fn style_for(&self, voice_id: &str) -> Result<&VoiceStyle, ModelError> {
        self.styles
            .get(voice_id)
            .ok_or_else(|| ModelError::UnknownVoice(voice_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
