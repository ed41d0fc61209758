//! Sharding manager contract (SMC) client.
//!
//! # Data Flow
//! ```text
//! Query:    SmcHandler → query.rs (encode getter) → LedgerGateway::call → decode → domain type
//! Mutation: SmcHandler → abi.rs (SmcCall::encode) → TxBuilder → nonce → sign → broadcast → TxHash
//! ```
//!
//! The contract's own rules (sampling, eligibility, slashing) stay on chain;
//! this module only reads its state and submits calls to it.

pub mod abi;
pub mod handler;
pub mod query;
pub mod types;

pub use abi::{EncodingError, SmcCall, SmcMethod};
pub use handler::SmcHandler;
pub use types::{CollationHeader, NotaryRecord, Period, ShardId, VoteTally};
