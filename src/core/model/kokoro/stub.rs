//! Loader used when the `kokoro` feature is disabled

use anyhow::{Result, anyhow};

use crate::core::model::{ModelConfig, SpeechModel};

/// Always fails: the ONNX runtime is not compiled in
pub fn load(_config: &ModelConfig, _voice_ids: &[&str]) -> Result<Box<dyn SpeechModel>> {
    Err(anyhow!(
        "Kokoro backend requires the `kokoro` feature. \
         Rebuild with `--features kokoro`, or set MODEL_BACKEND=none."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_missing_feature() {
        let err = load(&ModelConfig::default(), &["af_heart"]).err().unwrap();
        assert!(err.to_string().contains("`kokoro` feature"));
    }
}
