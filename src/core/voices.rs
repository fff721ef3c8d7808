//! Voice alias registry
//!
//! Maps the abstract voice names accepted by the speech endpoint (`default`,
//! `female`, ...) onto the voice identifiers understood by the model. Lookups
//! never fail: unknown names fall back to the voice bound to `default`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Alias every registry must carry
pub const DEFAULT_VOICE: &str = "default";

/// Built-in presets in listing order
pub const BUILTIN_VOICES: &[(&str, &str)] = &[
    ("default", "af_heart"),
    ("female", "af_bella"),
    ("male", "am_michael"),
    ("narrator", "af_sky"),
    ("energetic", "af_nicole"),
];

/// Binding of an abstract voice name to a model voice identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub alias: String,
    pub model_voice_id: String,
}

impl VoiceDescriptor {
    pub fn new(alias: impl Into<String>, model_voice_id: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            model_voice_id: model_voice_id.into(),
        }
    }
}

/// Immutable alias table, populated once at startup
#[derive(Debug, Clone)]
pub struct VoiceRegistry {
    entries: Vec<VoiceDescriptor>,
    index: HashMap<String, usize>,
}

impl VoiceRegistry {
    /// Registry holding only the built-in presets
    pub fn builtin() -> Self {
        Self::with_overrides(&[])
    }

    /// Built-in presets followed by configured additions.
    ///
    /// Overrides with a blank alias or voice id are skipped so a bad config
    /// entry can never remove the `default` binding.
    pub fn with_overrides(overrides: &[VoiceDescriptor]) -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(BUILTIN_VOICES.len() + overrides.len()),
            index: HashMap::new(),
        };

        for (alias, voice_id) in BUILTIN_VOICES {
            registry.insert(VoiceDescriptor::new(*alias, *voice_id));
        }

        for entry in overrides {
            if entry.alias.trim().is_empty() || entry.model_voice_id.trim().is_empty() {
                tracing::warn!("Ignoring incomplete voice preset: {:?}", entry);
                continue;
            }
            registry.insert(entry.clone());
        }

        registry
    }

    fn insert(&mut self, entry: VoiceDescriptor) {
        match self.index.get(&entry.alias) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(entry.alias.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Resolve a voice name, falling back to the `default` binding on a miss
    pub fn resolve(&self, voice_name: &str) -> &str {
        let position = self
            .index
            .get(voice_name)
            .or_else(|| self.index.get(DEFAULT_VOICE))
            .copied()
            .unwrap_or(0);
        &self.entries[position].model_voice_id
    }

    /// Whether `voice_name` is a registered alias
    pub fn contains(&self, voice_name: &str) -> bool {
        self.index.contains_key(voice_name)
    }

    pub fn list_aliases(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.alias.as_str()).collect()
    }

    pub fn descriptors(&self) -> &[VoiceDescriptor] {
        &self.entries
    }

    /// Distinct model voice ids in first-seen order
    pub fn model_voice_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !ids.contains(&entry.model_voice_id.as_str()) {
                ids.push(&entry.model_voice_id);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
