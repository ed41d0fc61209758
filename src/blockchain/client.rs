//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Serve read-only contract calls and nonce lookups, with failover
//! - Broadcast signed transactions to the primary endpoint exactly once
//! - Provide health check for blockchain connectivity

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::gateway::{CallContext, LedgerGateway};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, RpcConfig};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: RpcConfig,
    /// Read request timeout duration.
    timeout_duration: Duration,
    /// Raw transaction submission timeout duration.
    submission_timeout: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `config` - RPC configuration
    ///
    /// # Returns
    /// A new client or error if the primary URL is invalid
    pub async fn new(config: RpcConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let submission_timeout = Duration::from_secs(config.submission_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.url.parse().map_err(|e| {
            BlockchainError::RemoteCall(format!("Invalid RPC URL '{}': {}", config.url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
            submission_timeout,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
                // Don't fail initialization - allow graceful degradation
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match with_timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) if e.is_error_resp() => return Err(BlockchainError::RemoteCall(e.to_string())),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                    last_error = e.to_string();
                }
                Err(e) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                    last_error = e.to_string();
                }
            }
        }
        Err(BlockchainError::RemoteCall(format!("All RPC providers failed: {}", last_error)))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match with_timeout(self.timeout_duration, provider.get_block_number()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if e.is_error_resp() => return Err(BlockchainError::RemoteCall(e.to_string())),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                    last_error = e.to_string();
                }
                Err(e) => {
                    tracing::warn!(provider_idx = i, "RPC timeout");
                    last_error = e.to_string();
                }
            }
        }
        Err(BlockchainError::RemoteCall(format!(
            "All providers failed to get block number: {}",
            last_error
        )))
    }

    /// Check if the blockchain is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

/// Reads fail over on transport faults and timeouts only. A JSON-RPC error
/// response (revert, invalid params) is the node's answer and is returned
/// as is; asking the next provider would get the same answer.
#[async_trait]
impl LedgerGateway for BlockchainClient {
    async fn call(&self, contract: Address, ctx: &CallContext, data: Bytes) -> BlockchainResult<Bytes> {
        let request = ctx.to_request(contract, data);
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match with_timeout(self.timeout_duration, provider.call(request.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if e.is_error_resp() => return Err(BlockchainError::RemoteCall(e.to_string())),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                    last_error = e.to_string();
                }
                Err(e) => {
                    tracing::warn!(provider_idx = i, "RPC timeout");
                    last_error = e.to_string();
                }
            }
        }
        Err(BlockchainError::RemoteCall(format!(
            "All providers failed to call contract {}: {}",
            contract, last_error
        )))
    }

    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match with_timeout(self.timeout_duration, provider.get_transaction_count(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if e.is_error_resp() => return Err(BlockchainError::RemoteCall(e.to_string())),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                    last_error = e.to_string();
                }
                Err(e) => {
                    tracing::warn!(provider_idx = i, "RPC timeout");
                    last_error = e.to_string();
                }
            }
        }
        Err(BlockchainError::RemoteCall(format!(
            "All providers failed to get transaction count: {}",
            last_error
        )))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        // Primary only: a second broadcast is a second submission.
        let provider = &self.providers[0];
        let pending = with_timeout(self.submission_timeout, provider.send_raw_transaction(&raw))
            .await?
            .map_err(|e| BlockchainError::Submission(e.to_string()))?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("submission_timeout_secs", &self.config.submission_timeout_secs)
            .finish()
    }
}
