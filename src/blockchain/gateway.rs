//! Remote ledger seam.
//!
//! Everything the client needs from the chain goes through [`LedgerGateway`]:
//! read-only calls, the account transaction count, and raw transaction
//! submission. [`crate::blockchain::BlockchainClient`] is the JSON-RPC
//! implementation; tests substitute their own.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::BlockchainResult;

/// Parameters for a read-only invocation. Carries no nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub gas_limit: u64,
}

impl CallContext {
    /// Build the `eth_call` request for `data` against `contract`.
    pub fn to_request(&self, contract: Address, data: Bytes) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.sender)
            .with_to(contract)
            .with_gas_limit(self.gas_limit)
            .with_input(data)
    }
}

#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Execute a read-only call and return the raw ABI-encoded result.
    async fn call(&self, contract: Address, ctx: &CallContext, data: Bytes) -> BlockchainResult<Bytes>;

    /// Transaction count of `address`, i.e. its next confirmed nonce.
    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Broadcast a signed, EIP-2718 encoded transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;
}
