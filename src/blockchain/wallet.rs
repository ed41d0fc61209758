//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys are loaded from hex strings or environment variables
//! - Keys are never logged or serialized
//! - Only the derived address leaves this module

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::fmt;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "SMC_CLIENT_PRIVATE_KEY";

/// Something that can turn an unsigned request into raw signed bytes.
#[async_trait]
pub trait TransactionSigner: fmt::Debug + Send + Sync {
    /// Address the signatures recover to.
    fn address(&self) -> Address;

    /// Sign `tx` and return its EIP-2718 encoding, ready for broadcast.
    async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<Bytes>;
}

/// Wallet holding one private key.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `SMC_CLIENT_PRIVATE_KEY` from environment.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl TransactionSigner for Wallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .with_from(self.signer.address())
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;
        Ok(envelope.encoded_2718().into())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .finish()
    }
}
