//! Configuration loading from disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::defaults::{ClientConfig, ConfigKeyError};
use crate::config::schema::{ConfigValue, SmcClientConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Key(ConfigKeyError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Key(e) => write!(f, "Defaults error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SmcClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SmcClientConfig, ConfigError> {
    let config: SmcClientConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Turn the `[defaults]` table into the immutable client mapping.
pub fn build_client_config(
    defaults: &BTreeMap<String, ConfigValue>,
) -> Result<ClientConfig, ConfigError> {
    let mut values = Vec::with_capacity(defaults.len());
    let mut errors = Vec::new();
    for (key, raw) in defaults {
        match raw.to_u256() {
            Ok(v) => values.push((key.clone(), v)),
            Err(message) => errors.push(ValidationError {
                field: format!("defaults.{}", key),
                message,
            }),
        }
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    ClientConfig::new(values).map_err(ConfigError::Key)
}
