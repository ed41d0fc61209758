//! Configuration schema definitions.
//!
//! This module defines the on-disk configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Root configuration for the SMC client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SmcClientConfig {
    /// Ledger RPC endpoints and timeouts.
    pub rpc: RpcConfig,

    /// Location of the sharding manager contract.
    pub contract: ContractConfig,

    /// Named transaction defaults (`DEFAULT_GAS`, `GAS_PRICE`, `NOTARY_DEPOSIT`, ...).
    pub defaults: BTreeMap<String, ConfigValue>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,

    /// Failover JSON-RPC endpoint URLs, used for read-only requests only.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    /// Also the default EIP-155 chain id for signed transactions.
    pub chain_id: u64,

    /// Read request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Raw transaction submission timeout in seconds.
    pub submission_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            submission_timeout_secs: 30,
        }
    }
}

/// Contract location.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the sharding manager contract (hex, `0x`-prefixed).
    pub address: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A numeric default as written in the config file.
///
/// TOML integers stop at `i64::MAX`, so wei amounts such as a notary
/// deposit can also be given as decimal or `0x` hex strings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(u64),
    Text(String),
}

impl ConfigValue {
    /// Parse into a 256-bit unsigned integer.
    pub fn to_u256(&self) -> Result<U256, String> {
        match self {
            ConfigValue::Int(v) => Ok(U256::from(*v)),
            ConfigValue::Text(s) => s
                .trim()
                .parse::<U256>()
                .map_err(|e| format!("'{}' is not an unsigned integer: {}", s, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [rpc]
            url = "http://127.0.0.1:8545"
            chain_id = 31337
            submission_timeout_secs = 5

            [contract]
            address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

            [defaults]
            DEFAULT_GAS = 200000
            GAS_PRICE = 1
            NOTARY_DEPOSIT = "1000000000000000000000"
        "#;
        let config: SmcClientConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.rpc.chain_id, 31337);
        assert_eq!(config.rpc.submission_timeout_secs, 5);
        // unspecified fields fall back to defaults
        assert_eq!(config.rpc.rpc_timeout_secs, 10);
        assert_eq!(config.defaults["DEFAULT_GAS"], ConfigValue::Int(200_000));
        assert_eq!(
            config.defaults["NOTARY_DEPOSIT"].to_u256().unwrap(),
            U256::from(10u64).pow(U256::from(21u64))
        );
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_config_value_hex_and_garbage() {
        let hex = ConfigValue::Text("0x10".to_string());
        assert_eq!(hex.to_u256().unwrap(), U256::from(16u64));

        let bad = ConfigValue::Text("lots".to_string());
        assert!(bad.to_u256().is_err());
    }
}
