//! Transaction building, signing, and broadcast.
//!
//! # Responsibilities
//! - Resolve per-call overrides against the client defaults
//! - Resolve the signer's nonce under its submission lock
//! - Sign and broadcast exactly once, returning the transaction hash
//!
//! Confirmation tracking is left to the caller.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::fmt;
use std::sync::Arc;

use crate::blockchain::gateway::LedgerGateway;
use crate::blockchain::nonce::NonceManager;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::TransactionSigner;
use crate::config::ClientConfig;
use crate::observability::metrics;
use crate::smc::abi::SmcCall;

/// Per-call overrides. Unset fields fall back to the client defaults.
#[derive(Clone, Default)]
pub struct TxOverrides {
    /// Sign with this key instead of the client's default signer.
    pub signer: Option<Arc<dyn TransactionSigner>>,
    /// Use this nonce instead of resolving one from the gateway.
    pub nonce: Option<u64>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub chain_id: Option<u64>,
    pub value: Option<U256>,
}

impl TxOverrides {
    pub fn with_signer(mut self, signer: Arc<dyn TransactionSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Debug for TxOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxOverrides")
            .field("signer", &self.signer.as_ref().map(|s| s.address()))
            .field("nonce", &self.nonce)
            .field("gas", &self.gas)
            .field("gas_price", &self.gas_price)
            .field("chain_id", &self.chain_id)
            .field("value", &self.value)
            .finish()
    }
}

/// Overrides merged with defaults; everything except the nonce is settled.
#[derive(Debug, Clone)]
pub struct ResolvedDefaults {
    pub signer: Arc<dyn TransactionSigner>,
    /// Explicit nonce, if the caller supplied one.
    pub nonce: Option<u64>,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: Option<u64>,
    pub value: U256,
}

/// Merge `overrides` over the client defaults. No I/O.
pub fn resolve_defaults(
    overrides: &TxOverrides,
    config: &ClientConfig,
    default_signer: &Arc<dyn TransactionSigner>,
    default_chain_id: Option<u64>,
) -> ResolvedDefaults {
    ResolvedDefaults {
        signer: overrides
            .signer
            .clone()
            .unwrap_or_else(|| Arc::clone(default_signer)),
        nonce: overrides.nonce,
        gas_limit: overrides.gas.unwrap_or_else(|| config.default_gas()),
        gas_price: overrides.gas_price.unwrap_or_else(|| config.gas_price()),
        chain_id: overrides.chain_id.or(default_chain_id),
        value: overrides.value.unwrap_or(U256::ZERO),
    }
}

/// Fully-resolved parameters of one transaction. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionContext {
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: Option<u64>,
    pub value: U256,
    pub data: Bytes,
}

impl TransactionContext {
    /// Unsigned request from `from` to `contract`.
    pub fn to_request(&self, from: Address, contract: Address) -> TransactionRequest {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(contract)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price)
            .with_value(self.value)
            .with_input(self.data.clone());
        match self.chain_id {
            Some(chain_id) => tx.with_chain_id(chain_id),
            None => tx,
        }
    }
}

/// Transaction builder for registry calls.
#[derive(Clone)]
pub struct TxBuilder {
    gateway: Arc<dyn LedgerGateway>,
    contract: Address,
    config: Arc<ClientConfig>,
    default_signer: Arc<dyn TransactionSigner>,
    default_chain_id: Option<u64>,
    nonces: NonceManager,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        contract: Address,
        config: Arc<ClientConfig>,
        default_signer: Arc<dyn TransactionSigner>,
        default_chain_id: Option<u64>,
    ) -> Self {
        Self {
            gateway,
            contract,
            config,
            default_signer,
            default_chain_id,
            nonces: NonceManager::new(),
        }
    }

    /// Encode, sign and broadcast `call`.
    ///
    /// Exactly one broadcast per invocation. Submissions from one signer
    /// address are serialized and never share a nonce with an earlier
    /// submission that may be pending. A rejected broadcast gives its nonce
    /// back; a timed-out or abandoned one keeps it reserved.
    pub async fn submit(&self, call: &SmcCall, overrides: TxOverrides) -> BlockchainResult<TxHash> {
        let method = call.method().name();
        let result = self.submit_inner(call, overrides).await;
        match &result {
            Ok(tx_hash) => {
                metrics::record_transaction(method, "ok");
                tracing::info!(method, tx_hash = %tx_hash, "Transaction submitted");
            }
            Err(e) => {
                metrics::record_transaction(method, e.kind());
                tracing::warn!(method, error = %e, "Transaction failed");
            }
        }
        result
    }

    async fn submit_inner(&self, call: &SmcCall, overrides: TxOverrides) -> BlockchainResult<TxHash> {
        let resolved = resolve_defaults(
            &overrides,
            &self.config,
            &self.default_signer,
            self.default_chain_id,
        );
        let data = call.encode();
        let from = resolved.signer.address();

        let mut slot = self.nonces.lock(from).await;

        let nonce = match resolved.nonce {
            Some(nonce) => nonce,
            None => {
                let chain_count = self.gateway.get_transaction_count(from).await?;
                let nonce = slot.next_nonce(chain_count);
                tracing::debug!(address = %from, chain_count, nonce, "Resolved nonce");
                nonce
            }
        };

        let ctx = TransactionContext {
            nonce,
            gas_limit: resolved.gas_limit,
            gas_price: resolved.gas_price,
            chain_id: resolved.chain_id,
            value: resolved.value,
            data,
        };
        let raw = resolved
            .signer
            .sign_transaction(ctx.to_request(from, self.contract))
            .await?;

        let reservation = slot.reserve(nonce);
        match self.gateway.send_raw_transaction(raw).await {
            Ok(tx_hash) => Ok(tx_hash),
            Err(e @ BlockchainError::Timeout(_)) => {
                // The transaction may be pending; keep its nonce claimed.
                tracing::warn!(address = %from, nonce, "Broadcast outcome unknown, nonce stays reserved");
                Err(e)
            }
            Err(e) => {
                slot.release(reservation);
                Err(e)
            }
        }
    }

    /// Address of the default signer.
    pub fn address(&self) -> Address {
        self.default_signer.address()
    }

    pub fn contract(&self) -> Address {
        self.contract
    }
}
