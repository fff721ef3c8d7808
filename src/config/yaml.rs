use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override the matching environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   tls:
///     enabled: false
///     cert_path: "/etc/tts/cert.pem"
///     key_path: "/etc/tts/key.pem"
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
///
/// model:
///   backend: "kokoro"
///   label: "Kokoro-82M"
///   model_path: "/models/kokoro-v1.0.onnx"
///   voices_path: "/models/voices"
///   num_threads: 4
///   language: "en-us"
///
/// cache:
///   path: "/var/cache/tts-gateway"
///
/// voices:
///   british: "bf_emma"
///   male: "am_adam"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub security: Option<SecurityYaml>,
    pub model: Option<ModelYaml>,
    pub cache: Option<CacheYaml>,
    /// Alias to model voice id, kept in file order
    pub voices: Option<serde_yaml::Mapping>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// CORS and rate limiting from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

/// Speech model settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ModelYaml {
    pub backend: Option<String>,
    pub label: Option<String>,
    pub model_path: Option<String>,
    pub voices_path: Option<String>,
    pub model_url: Option<String>,
    pub voices_url: Option<String>,
    pub num_threads: Option<usize>,
    pub language: Option<String>,
}

/// Cache configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheYaml {
    pub path: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8001
security:
  cors_allowed_origins: "https://app.example.com"
  rate_limit_requests_per_second: 5
model:
  backend: none
  num_threads: 2
cache:
  path: "/tmp/cache"
voices:
  calm: af_sarah
"#;

        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(server.port, Some(8001));

        let security = config.security.as_ref().unwrap();
        assert_eq!(security.rate_limit_requests_per_second, Some(5));
        assert_eq!(security.rate_limit_burst_size, None);

        let model = config.model.as_ref().unwrap();
        assert_eq!(model.backend.as_deref(), Some("none"));
        assert_eq!(model.num_threads, Some(2));

        assert_eq!(
            config.cache.as_ref().unwrap().path.as_deref(),
            Some("/tmp/cache")
        );
        assert_eq!(config.voices.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.model.is_none());
        assert!(config.voices.is_none());
    }

    #[test]
    fn test_yaml_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "server:\n  port: 9001\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(config.server.unwrap().port, Some(9001));
    }

    #[test]
    fn test_yaml_config_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "server: [unclosed").unwrap();

        assert!(YamlConfig::from_file(&path).is_err());
    }
}
