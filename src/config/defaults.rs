//! Named transaction defaults shared by every call issued through one client.

use std::collections::BTreeMap;

use alloy::primitives::U256;
use thiserror::Error;

/// Gas limit used for calls and transactions without an override.
pub const DEFAULT_GAS: &str = "DEFAULT_GAS";
/// Gas price (wei) used for transactions without an override.
pub const GAS_PRICE: &str = "GAS_PRICE";
/// Value (wei) attached to `register_notary`.
pub const NOTARY_DEPOSIT: &str = "NOTARY_DEPOSIT";

/// Keys that must be present for a client to be constructed.
pub const REQUIRED_KEYS: [&str; 3] = [DEFAULT_GAS, GAS_PRICE, NOTARY_DEPOSIT];

/// Lookup failure on the client defaults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigKeyError {
    #[error("missing config key {0}")]
    Missing(String),

    #[error("config key {key} = {value} does not fit in {target}")]
    OutOfRange {
        key: String,
        value: U256,
        target: &'static str,
    },
}

/// Immutable mapping of named defaults.
///
/// Built once, validated at construction, never mutated afterwards. Per-call
/// overrides live in `TxOverrides`, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    values: BTreeMap<String, U256>,
    default_gas: u64,
    gas_price: u128,
    notary_deposit: U256,
}

impl ClientConfig {
    /// Build the mapping, failing on the first missing or unusable required key.
    pub fn new<I, K>(values: I) -> Result<Self, ConfigKeyError>
    where
        I: IntoIterator<Item = (K, U256)>,
        K: Into<String>,
    {
        let values: BTreeMap<String, U256> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let lookup = |key: &str| {
            values
                .get(key)
                .copied()
                .ok_or_else(|| ConfigKeyError::Missing(key.to_string()))
        };

        let gas = lookup(DEFAULT_GAS)?;
        let default_gas = u64::try_from(gas).map_err(|_| ConfigKeyError::OutOfRange {
            key: DEFAULT_GAS.to_string(),
            value: gas,
            target: "u64",
        })?;

        let price = lookup(GAS_PRICE)?;
        let gas_price = u128::try_from(price).map_err(|_| ConfigKeyError::OutOfRange {
            key: GAS_PRICE.to_string(),
            value: price,
            target: "u128",
        })?;

        let notary_deposit = lookup(NOTARY_DEPOSIT)?;

        Ok(Self {
            values,
            default_gas,
            gas_price,
            notary_deposit,
        })
    }

    /// Look up any default by name.
    pub fn get(&self, key: &str) -> Result<U256, ConfigKeyError> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| ConfigKeyError::Missing(key.to_string()))
    }

    pub fn default_gas(&self) -> u64 {
        self.default_gas
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn notary_deposit(&self) -> U256 {
        self.notary_deposit
    }

    /// Iterate over every configured key in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &U256)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
