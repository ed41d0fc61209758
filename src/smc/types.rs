//! Domain views over registry state.

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Fixed-length block-count epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period(pub u64);

/// Shard identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardId(pub u64);

impl From<u64> for Period {
    fn from(p: u64) -> Self {
        Self(p)
    }
}

impl From<Period> for i128 {
    fn from(p: Period) -> Self {
        i128::from(p.0)
    }
}

impl From<u64> for ShardId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ShardId> for i128 {
    fn from(id: ShardId) -> Self {
        i128::from(id.0)
    }
}

/// Registry entry for a notary address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaryRecord {
    /// Slot in the notary pool.
    pub pool_index: u64,
    /// Period in which the notary deregistered; zero while registered.
    pub deregistered_period: u64,
}

impl NotaryRecord {
    pub fn is_deregistered(&self) -> bool {
        self.deregistered_period != 0
    }
}

/// Collation header as recorded for a (period, shard) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationHeader {
    pub period: Period,
    pub shard_id: ShardId,
    pub chunk_root: B256,
    pub proposer: Address,
    pub is_elected: bool,
}

/// Per-shard vote aggregate for the active period.
///
/// The contract packs votes into one word: the high 31 bytes are a bitfield
/// where committee index `i` is bit `255 - i`, the low byte is the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub shard_id: ShardId,
    pub current_vote_hash: B256,
    pub vote_count: u64,
    pub voted_bitmap: U256,
}

impl VoteTally {
    /// Highest committee index representable in the bitfield.
    pub const MAX_INDEX: u64 = 247;

    pub fn new(shard_id: ShardId, current_vote_hash: B256, vote_count: u64) -> Self {
        let word = U256::from_be_bytes(current_vote_hash.0);
        let voted_bitmap = word & !U256::from(0xffu64);
        Self {
            shard_id,
            current_vote_hash,
            vote_count,
            voted_bitmap,
        }
    }

    /// Whether committee member `index` has voted, read from the bitmap.
    pub fn has_voted(&self, index: u64) -> bool {
        if index > Self::MAX_INDEX {
            return false;
        }
        self.voted_bitmap.bit(255 - index as usize)
    }

    /// Committee indices that have voted, ascending.
    pub fn voters(&self) -> Vec<u64> {
        (0..=Self::MAX_INDEX).filter(|i| self.has_voted(*i)).collect()
    }
}
