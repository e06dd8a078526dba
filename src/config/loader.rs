//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, without validating it.
///
/// Callers apply command-line overrides before calling [`validate_config`].
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Validate a fully assembled configuration.
pub fn finalize(config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_and_finalize() {
        let path = std::env::temp_dir().join(format!("gateway-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:18081\"").unwrap();
        drop(file);

        let config = finalize(load_config(&path).unwrap()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:18081");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_finalize_reports_every_problem() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "bad".into();
        config.upstream.connect_timeout_secs = 0;

        let err = finalize(config).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("listener.bind_address"));
        assert!(message.contains("upstream.connect_timeout_secs"));
    }
}
