//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + config file (RPC URL)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts, implements gateway.rs)
//!     → transaction.rs (resolve defaults, nonce.rs lock, sign, broadcast)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or explicit hex input
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod gateway;
pub mod nonce;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use gateway::{CallContext, LedgerGateway};
pub use transaction::{TransactionContext, TxBuilder, TxOverrides};
pub use types::{BlockchainError, BlockchainResult, ChainId};
pub use wallet::{TransactionSigner, Wallet};
