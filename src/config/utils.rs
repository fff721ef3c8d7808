use crate::core::VoiceDescriptor;

/// Parse a boolean value from a string, supporting multiple formats
///
/// Accepts: "true", "false", "1", "0", "yes", "no" (case insensitive)
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse `alias=voice_id` pairs separated by commas
pub fn parse_voice_presets(s: &str) -> Result<Vec<VoiceDescriptor>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((alias, voice_id)) if !alias.trim().is_empty() && !voice_id.trim().is_empty() => {
                Ok(VoiceDescriptor::new(alias.trim(), voice_id.trim()))
            }
            _ => Err(format!(
                "Invalid voice preset '{pair}', expected 'alias=voice_id'"
            )),
        })
        .collect()
}

/// Convert a YAML mapping of alias to voice id into descriptors
pub fn voice_presets_from_yaml(
    mapping: &serde_yaml::Mapping,
) -> Result<Vec<VoiceDescriptor>, String> {
    mapping
        .iter()
        .map(|(alias, voice_id)| match (alias.as_str(), voice_id.as_str()) {
            (Some(alias), Some(voice_id)) => Ok(VoiceDescriptor::new(alias, voice_id)),
            _ => Err(format!(
                "Invalid entry in 'voices': {alias:?} -> {voice_id:?}, expected string pairs"
            )),
        })
        .collect()
}
