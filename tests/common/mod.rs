//! Shared stubs for integration tests: an in-memory ledger gateway and a
//! signer that records what it was asked to sign.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::consensus::{Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use smc_client::blockchain::{
    BlockchainError, BlockchainResult, CallContext, LedgerGateway, TransactionSigner, Wallet,
};
use smc_client::config::defaults::{DEFAULT_GAS, GAS_PRICE, NOTARY_DEPOSIT};
use smc_client::config::ClientConfig;
use smc_client::SmcHandler;

// Anvil's first two accounts
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const OTHER_PRIVATE_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub fn contract_address() -> Address {
    Address::repeat_byte(0x5c)
}

/// `{DEFAULT_GAS: 200000, GAS_PRICE: 1, NOTARY_DEPOSIT: 1000}`
pub fn test_config() -> ClientConfig {
    ClientConfig::new([
        (DEFAULT_GAS, U256::from(200_000u64)),
        (GAS_PRICE, U256::from(1u64)),
        (NOTARY_DEPOSIT, U256::from(1000u64)),
    ])
    .unwrap()
}

/// How the stub answers `send_raw_transaction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitMode {
    #[default]
    Accept,
    /// Definite rejection, e.g. "nonce too low".
    Reject,
    /// Report a timeout; the transaction may or may not have gone out.
    TimeOut,
    /// Never answer.
    Stall,
}

/// In-memory gateway.
///
/// Read calls are answered from canned responses keyed by selector. The
/// reported transaction count starts at a fixed value and, when
/// `advance_on_submit` is set, increments with each accepted submission.
#[derive(Default)]
pub struct StubGateway {
    responses: Mutex<HashMap<[u8; 4], Bytes>>,
    tx_count: AtomicU64,
    advance_on_submit: bool,
    submit_mode: Mutex<SubmitMode>,
    pub calls: Mutex<Vec<(Address, CallContext, Bytes)>>,
    pub nonce_lookups: AtomicUsize,
    pub submissions: Mutex<Vec<Bytes>>,
}

impl StubGateway {
    /// Transaction count follows accepted submissions, like a chain that
    /// mines every transaction immediately.
    pub fn mining(tx_count: u64) -> Arc<Self> {
        Arc::new(Self {
            tx_count: AtomicU64::new(tx_count),
            advance_on_submit: true,
            ..Self::default()
        })
    }

    /// Transaction count stays put; everything submitted remains pending.
    pub fn pending(tx_count: u64) -> Arc<Self> {
        Arc::new(Self {
            tx_count: AtomicU64::new(tx_count),
            ..Self::default()
        })
    }

    pub fn respond<C: SolCall>(&self, word: impl Into<Bytes>) {
        self.responses.lock().unwrap().insert(C::SELECTOR, word.into());
    }

    pub fn set_submit_mode(&self, mode: SubmitMode) {
        *self.submit_mode.lock().unwrap() = mode;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn nonce_lookup_count(&self) -> usize {
        self.nonce_lookups.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.submissions.lock().unwrap().clone()
    }

    /// Decode every accepted submission.
    pub fn submitted_txs(&self) -> Vec<Signed<TxLegacy>> {
        self.submitted().iter().map(|raw| decode_legacy(raw)).collect()
    }
}

#[async_trait]
impl LedgerGateway for StubGateway {
    async fn call(&self, contract: Address, ctx: &CallContext, data: Bytes) -> BlockchainResult<Bytes> {
        self.calls.lock().unwrap().push((contract, *ctx, data.clone()));
        if data.len() < 4 {
            return Err(BlockchainError::RemoteCall("calldata too short".to_string()));
        }
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        self.responses
            .lock()
            .unwrap()
            .get(&selector)
            .cloned()
            .ok_or_else(|| BlockchainError::RemoteCall("execution reverted".to_string()))
    }

    async fn get_transaction_count(&self, _address: Address) -> BlockchainResult<u64> {
        self.nonce_lookups.fetch_add(1, Ordering::SeqCst);
        // widen the race window for concurrent submitters
        tokio::task::yield_now().await;
        Ok(self.tx_count.load(Ordering::SeqCst))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let mode = *self.submit_mode.lock().unwrap();
        match mode {
            SubmitMode::Accept => {}
            SubmitMode::Reject => {
                return Err(BlockchainError::Submission("nonce too low".to_string()))
            }
            SubmitMode::TimeOut => return Err(BlockchainError::Timeout(30)),
            SubmitMode::Stall => std::future::pending::<()>().await,
        }
        let hash = keccak256(&raw);
        self.submissions.lock().unwrap().push(raw);
        if self.advance_on_submit {
            self.tx_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(hash)
    }
}

/// Wallet wrapper that records every request it signs.
#[derive(Debug)]
pub struct RecordingSigner {
    wallet: Wallet,
    fail: bool,
    pub requests: Mutex<Vec<TransactionRequest>>,
}

impl RecordingSigner {
    pub fn new(key: &str) -> Arc<Self> {
        Arc::new(Self {
            wallet: Wallet::from_private_key(key).unwrap(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A signer whose key is unusable: every signing attempt fails.
    pub fn broken(key: &str) -> Arc<Self> {
        Arc::new(Self {
            wallet: Wallet::from_private_key(key).unwrap(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn sign_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionSigner for RecordingSigner {
    fn address(&self) -> Address {
        self.wallet.address()
    }

    async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.requests.lock().unwrap().push(tx.clone());
        if self.fail {
            return Err(BlockchainError::Signing("corrupted key".to_string()));
        }
        self.wallet.sign_transaction(tx).await
    }
}

pub fn handler(gateway: Arc<StubGateway>, signer: Arc<RecordingSigner>) -> SmcHandler {
    SmcHandler::new(gateway, contract_address(), test_config(), signer, None)
}

pub fn decode_legacy(raw: &Bytes) -> Signed<TxLegacy> {
    match TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap() {
        TxEnvelope::Legacy(signed) => signed,
        other => panic!("expected legacy transaction, got {:?}", other.tx_type()),
    }
}

pub fn word_u64(v: u64) -> Bytes {
    U256::from(v).to_be_bytes::<32>().to_vec().into()
}

pub fn word_bool(v: bool) -> Bytes {
    word_u64(v as u64)
}

pub fn word_address(a: Address) -> Bytes {
    a.into_word().0.to_vec().into()
}

pub fn word_b256(w: B256) -> Bytes {
    w.0.to_vec().into()
}

/// Two's-complement encoding of `-1`.
pub fn word_minus_one() -> Bytes {
    vec![0xffu8; 32].into()
}

pub fn concat(words: &[Bytes]) -> Bytes {
    words.iter().flat_map(|w| w.iter().copied()).collect::<Vec<u8>>().into()
}
