//! Client façade over the sharding manager contract.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash, B256};
use std::sync::Arc;

use crate::blockchain::gateway::{CallContext, LedgerGateway};
use crate::blockchain::transaction::{TxBuilder, TxOverrides};
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::TransactionSigner;
use crate::config::ClientConfig;
use crate::smc::abi::SmcCall;
use crate::smc::types::{Period, ShardId};

/// Registry client bound to one contract, one set of defaults and one
/// default signer.
///
/// Holds no cached chain state: every read goes to the gateway.
#[derive(Clone)]
pub struct SmcHandler {
    pub(crate) gateway: Arc<dyn LedgerGateway>,
    pub(crate) contract: Address,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) default_signer: Arc<dyn TransactionSigner>,
    builder: TxBuilder,
}

impl SmcHandler {
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        contract: Address,
        config: ClientConfig,
        default_signer: Arc<dyn TransactionSigner>,
        chain_id: Option<u64>,
    ) -> Self {
        let config = Arc::new(config);
        let builder = TxBuilder::new(
            gateway.clone(),
            contract,
            config.clone(),
            default_signer.clone(),
            chain_id,
        );
        tracing::info!(
            contract = %contract,
            sender = %default_signer.address(),
            "SMC handler ready"
        );
        Self {
            gateway,
            contract,
            config,
            default_signer,
            builder,
        }
    }

    /// Address of the default signer.
    pub fn sender_address(&self) -> Address {
        self.default_signer.address()
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Context used for every read: own address, default gas.
    pub fn basic_call_context(&self) -> CallContext {
        CallContext {
            sender: self.sender_address(),
            gas_limit: self.config.default_gas(),
        }
    }

    /// Submit any supported call.
    ///
    /// `register_notary` always carries the configured notary deposit.
    pub async fn send(&self, call: &SmcCall, mut overrides: TxOverrides) -> BlockchainResult<TxHash> {
        if let SmcCall::RegisterNotary = call {
            overrides.value = Some(self.config.notary_deposit());
        }
        self.builder.submit(call, overrides).await
    }

    /// Submit a method by name with dynamically typed arguments.
    ///
    /// Unknown names and mismatched arguments fail before any gateway traffic.
    pub async fn submit(
        &self,
        method: &str,
        args: &[DynSolValue],
        overrides: TxOverrides,
    ) -> BlockchainResult<TxHash> {
        let call = SmcCall::from_parts(method.parse()?, args)?;
        self.send(&call, overrides).await
    }

    /// Join the notary pool, paying the deposit.
    pub async fn register_notary(&self, overrides: TxOverrides) -> BlockchainResult<TxHash> {
        self.send(&SmcCall::RegisterNotary, overrides).await
    }

    pub async fn deregister_notary(&self, overrides: TxOverrides) -> BlockchainResult<TxHash> {
        self.send(&SmcCall::DeregisterNotary, overrides).await
    }

    /// Withdraw the deposit after the lockup following deregistration.
    pub async fn release_notary(&self, overrides: TxOverrides) -> BlockchainResult<TxHash> {
        self.send(&SmcCall::ReleaseNotary, overrides).await
    }

    pub async fn add_header(
        &self,
        period: Period,
        shard_id: ShardId,
        chunk_root: B256,
        overrides: TxOverrides,
    ) -> BlockchainResult<TxHash> {
        let call = SmcCall::AddHeader {
            period,
            shard_id,
            chunk_root,
        };
        self.send(&call, overrides).await
    }

    pub async fn submit_vote(
        &self,
        period: Period,
        shard_id: ShardId,
        chunk_root: B256,
        index: u64,
        overrides: TxOverrides,
    ) -> BlockchainResult<TxHash> {
        let call = SmcCall::SubmitVote {
            period,
            shard_id,
            chunk_root,
            index,
        };
        self.send(&call, overrides).await
    }
}

impl std::fmt::Debug for SmcHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmcHandler")
            .field("contract", &self.contract)
            .field("sender", &self.sender_address())
            .finish()
    }
}
