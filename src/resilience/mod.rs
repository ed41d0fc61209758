//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the ledger:
//!     → timeouts.rs (enforce read or submission deadline)
//!     → On failure: reads fail over to the next provider,
//!       submissions surface the error to the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Submissions are never retried here; a retry must re-resolve the nonce

pub mod timeouts;
