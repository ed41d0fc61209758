//! Chain-specific types and error definitions.

use thiserror::Error;

use crate::config::defaults::ConfigKeyError;
use crate::smc::abi::EncodingError;

// Re-export RpcConfig from config module to avoid duplication
pub use crate::config::schema::RpcConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur while querying the registry or submitting to it.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// A required client default is missing or unusable.
    #[error(transparent)]
    ConfigKey(#[from] ConfigKeyError),

    /// Method name or argument shape does not match the registry ABI.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A read-only call was rejected by the gateway or failed in transit.
    #[error("RPC error: {0}")]
    RemoteCall(String),

    /// The signer refused the payload or the key is unusable.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The gateway did not accept the signed transaction.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// A returned value could not be mapped onto its domain type.
    #[error("Cannot decode {method} result: {reason}")]
    Decode { method: &'static str, reason: String },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl BlockchainError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockchainError::ConfigKey(_) => "config_key",
            BlockchainError::Encoding(_) => "encoding",
            BlockchainError::RemoteCall(_) => "remote_call",
            BlockchainError::Signing(_) => "signing",
            BlockchainError::Submission(_) => "submission",
            BlockchainError::Timeout(_) => "timeout",
            BlockchainError::Decode { .. } => "decode",
            BlockchainError::ChainMismatch { .. } => "chain_mismatch",
            BlockchainError::Wallet(_) => "wallet",
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
