//! Client for the sharding manager contract: registry reads and signed
//! notary/collation/vote transactions.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod resilience;
pub mod smc;

pub use blockchain::{BlockchainClient, BlockchainError, TxOverrides, Wallet};
pub use config::{ClientConfig, SmcClientConfig};
pub use smc::SmcHandler;
