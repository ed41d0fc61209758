//! Per-signer nonce serialization.
//!
//! The gateway's transaction count only reflects confirmed transactions, so
//! two submissions in flight from one address would both see the same
//! count. Every submission for an address therefore runs under that
//! address's lock, and the lock remembers the nonce after the last
//! submission that may have reached the network.
//!
//! A nonce is reserved before broadcast. Only a definite rejection gives it
//! back; a broadcast that timed out or was abandoned keeps its reservation,
//! since the transaction may be pending.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock registry keyed by signer address.
#[derive(Debug, Clone, Default)]
pub struct NonceManager {
    slots: Arc<DashMap<Address, Arc<Mutex<NonceSlot>>>>,
}

/// State guarded by one address lock.
#[derive(Debug, Default)]
pub struct NonceSlot {
    /// Nonce following the last reserved submission, if any.
    next: Option<u64>,
}

/// Undo token for [`NonceSlot::reserve`]: the watermark before the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Reservation {
    prior: Option<u64>,
}

impl NonceSlot {
    /// Pick the nonce to use given the gateway's transaction count.
    pub fn next_nonce(&self, chain_count: u64) -> u64 {
        match self.next {
            Some(local) => local.max(chain_count),
            None => chain_count,
        }
    }

    /// Claim `nonce` ahead of broadcast. Never lowers the watermark.
    pub fn reserve(&mut self, nonce: u64) -> Reservation {
        let prior = self.next;
        let after = nonce.saturating_add(1);
        self.next = Some(prior.map_or(after, |n| n.max(after)));
        Reservation { prior }
    }

    /// Give back a claim the gateway definitely rejected.
    ///
    /// Trims to the watermark of earlier reservations; those may still be
    /// pending and are never handed out again.
    pub fn release(&mut self, reservation: Reservation) {
        self.next = reservation.prior;
    }
}

impl NonceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the submission lock for `address`.
    ///
    /// Held across nonce resolution, signing and broadcast.
    pub async fn lock(&self, address: Address) -> OwnedMutexGuard<NonceSlot> {
        let slot = self
            .slots
            .entry(address)
            .or_insert_with(|| Arc::new(Mutex::new(NonceSlot::default())))
            .clone();
        slot.lock_owned().await
    }
}
