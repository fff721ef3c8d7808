use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::utils::{parse_bool, parse_voice_presets, voice_presets_from_yaml};
use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig};
use crate::core::model::config::{DEFAULT_MODEL_LABEL, DEFAULT_MODEL_URL, DEFAULT_VOICES_URL};
use crate::core::{ModelBackend, ModelConfig};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
///
/// # Returns
/// * `Result<ServerConfig, Box<dyn std::error::Error>>` - The merged configuration or an error
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| env::var($env_var).ok())
        };
    }

    // Helper macro for parsed numeric values: YAML > ENV (parsed) > Default
    macro_rules! get_parsed {
        ($env_var:expr, $yaml_value:expr, $ty:ty, $default:expr) => {
            match $yaml_value {
                Some(value) => value,
                None => match env::var($env_var) {
                    Ok(raw) => raw
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| format!("Invalid {} environment variable: {e}", $env_var))?,
                    Err(_) => $default,
                },
            }
        };
    }

    // Server configuration
    let server = yaml.server.as_ref();
    let host = get_value!("HOST", server.and_then(|s| s.host.clone()), "0.0.0.0");
    let port = get_parsed!("PORT", server.and_then(|s| s.port), u16, 8000);

    // TLS configuration
    let tls_yaml = server.and_then(|s| s.tls.as_ref());
    let tls_enabled = match tls_yaml.and_then(|t| t.enabled) {
        Some(enabled) => enabled,
        None => match env::var("TLS_ENABLED") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| format!("Invalid TLS_ENABLED environment variable: {raw}"))?,
            Err(_) => false,
        },
    };
    let tls = if tls_enabled {
        let cert_path = get_optional!("TLS_CERT_PATH", tls_yaml.and_then(|t| t.cert_path.clone()))
            .ok_or("TLS_CERT_PATH is required when TLS is enabled")?;
        let key_path = get_optional!("TLS_KEY_PATH", tls_yaml.and_then(|t| t.key_path.clone()))
            .ok_or("TLS_KEY_PATH is required when TLS is enabled")?;
        Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        })
    } else {
        None
    };

    // Security configuration
    let security = yaml.security.as_ref();
    let cors_allowed_origins = Some(get_value!(
        "CORS_ALLOWED_ORIGINS",
        security.and_then(|s| s.cors_allowed_origins.clone()),
        "*"
    ));
    let rate_limit_requests_per_second = get_parsed!(
        "RATE_LIMIT_REQUESTS_PER_SECOND",
        security.and_then(|s| s.rate_limit_requests_per_second),
        u32,
        60
    );
    let rate_limit_burst_size = get_parsed!(
        "RATE_LIMIT_BURST_SIZE",
        security.and_then(|s| s.rate_limit_burst_size),
        u32,
        10
    );

    // Model configuration
    let model_yaml = yaml.model.as_ref();
    let backend_raw = get_value!(
        "MODEL_BACKEND",
        model_yaml.and_then(|m| m.backend.clone()),
        ModelBackend::default()
    );
    let backend = ModelBackend::from_str(&backend_raw)?;

    let cache_path = get_optional!(
        "CACHE_PATH",
        yaml.cache.as_ref().and_then(|c| c.path.clone())
    )
    .map(PathBuf::from);

    let num_threads = match model_yaml.and_then(|m| m.num_threads) {
        Some(threads) => Some(threads),
        None => match env::var("MODEL_NUM_THREADS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("Invalid MODEL_NUM_THREADS environment variable: {e}"))?,
            ),
            Err(_) => None,
        },
    };

    let model = ModelConfig {
        backend,
        label: get_value!(
            "MODEL_LABEL",
            model_yaml.and_then(|m| m.label.clone()),
            DEFAULT_MODEL_LABEL
        ),
        model_path: get_optional!("MODEL_PATH", model_yaml.and_then(|m| m.model_path.clone()))
            .map(PathBuf::from),
        voices_path: get_optional!(
            "VOICES_PATH",
            model_yaml.and_then(|m| m.voices_path.clone())
        )
        .map(PathBuf::from),
        cache_path,
        model_url: Some(get_value!(
            "MODEL_URL",
            model_yaml.and_then(|m| m.model_url.clone()),
            DEFAULT_MODEL_URL
        )),
        voices_url: Some(get_value!(
            "VOICES_URL",
            model_yaml.and_then(|m| m.voices_url.clone()),
            DEFAULT_VOICES_URL
        )),
        num_threads,
        language: get_value!(
            "ESPEAK_LANGUAGE",
            model_yaml.and_then(|m| m.language.clone()),
            "en-us"
        ),
    };

    // Voice presets: YAML mapping replaces the environment list entirely
    let voice_presets = match &yaml.voices {
        Some(mapping) => voice_presets_from_yaml(mapping)?,
        None => match env::var("VOICE_PRESETS") {
            Ok(raw) => parse_voice_presets(&raw)?,
            Err(_) => Vec::new(),
        },
    };

    Ok(ServerConfig {
        host,
        port,
        tls,
        cors_allowed_origins,
        rate_limit_requests_per_second,
        rate_limit_burst_size,
        model,
        voice_presets,
    })
}
