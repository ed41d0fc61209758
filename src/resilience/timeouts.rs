//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap ledger calls with a deadline
//! - Keep timeout errors distinct from RPC errors
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Read calls and submissions carry separate, configured deadlines

use std::future::IntoFuture;
use std::time::Duration;

use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Run `fut` under `duration`, mapping expiry to [`BlockchainError::Timeout`].
///
/// The inner output is returned untouched so callers keep deciding how to
/// map the transport error.
pub async fn with_timeout<F>(duration: Duration, fut: F) -> BlockchainResult<F::Output>
where
    F: IntoFuture,
{
    timeout(duration, fut)
        .await
        .map_err(|_| BlockchainError::Timeout(duration.as_secs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let out = with_timeout(Duration::from_secs(1), async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn test_expiry_is_timeout_error() {
        let slow = tokio::time::sleep(Duration::from_secs(60));
        let err = with_timeout(Duration::from_millis(20), slow).await.unwrap_err();
        assert!(matches!(err, BlockchainError::Timeout(_)));
    }
}
