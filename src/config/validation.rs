use std::path::Path;

use super::{ServerConfig, TlsConfig};

/// Run every validation rule against a merged configuration
pub fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_port(config.port)?;
    validate_rate_limits(
        config.rate_limit_requests_per_second,
        config.rate_limit_burst_size,
    )?;
    if let Some(tls) = &config.tls {
        validate_tls(tls)?;
    }
    config
        .model
        .validate()
        .map_err(|e| format!("Invalid model configuration: {e}"))?;
    Ok(())
}

pub fn validate_port(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    if port == 0 {
        return Err("PORT must be greater than 0".into());
    }
    Ok(())
}

/// Both the sustained rate and the burst allowance must be positive
pub fn validate_rate_limits(
    requests_per_second: u32,
    burst_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than 0".into());
    }
    if burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than 0".into());
    }
    Ok(())
}

/// Certificate and key files must exist when TLS is enabled
pub fn validate_tls(tls: &TlsConfig) -> Result<(), Box<dyn std::error::Error>> {
    for (name, path) in [("TLS_CERT_PATH", &tls.cert_path), ("TLS_KEY_PATH", &tls.key_path)] {
        if !Path::new(path).exists() {
            return Err(format!("{name} file does not exist: {}", path.display()).into());
        }
    }
    Ok(())
}
