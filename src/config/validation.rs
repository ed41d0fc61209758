//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoints, contract address and timeouts
//! - Check that every required transaction default is present and numeric
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SmcClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::config::defaults::REQUIRED_KEYS;
use crate::config::schema::SmcClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `rpc.url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SmcClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.rpc.url.parse::<url::Url>() {
        errors.push(ValidationError::new("rpc.url", format!("invalid URL: {}", e)));
    }
    for (i, failover) in config.rpc.failover_urls.iter().enumerate() {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::new(
                format!("rpc.failover_urls[{}]", i),
                format!("invalid URL: {}", e),
            ));
        }
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.rpc.submission_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "rpc.submission_timeout_secs",
            "must be greater than 0",
        ));
    }

    if let Err(e) = config.contract.address.parse::<Address>() {
        errors.push(ValidationError::new(
            "contract.address",
            format!("invalid address: {}", e),
        ));
    }

    for key in REQUIRED_KEYS {
        if !config.defaults.contains_key(key) {
            errors.push(ValidationError::new(format!("defaults.{}", key), "is required"));
        }
    }
    for (key, value) in &config.defaults {
        if let Err(e) = value.to_u256() {
            errors.push(ValidationError::new(format!("defaults.{}", key), e));
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
