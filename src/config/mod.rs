//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SmcClientConfig (validated)
//!     → defaults.rs builds ClientConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Defaults are immutable once loaded; per-call overrides never touch them
//! - Required defaults are checked at construction, not at first use
//! - Validation separates syntactic (serde) from semantic checks

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::{ClientConfig, ConfigKeyError};
pub use loader::{build_client_config, load_config, ConfigError};
pub use schema::{ContractConfig, ObservabilityConfig, RpcConfig, SmcClientConfig};
