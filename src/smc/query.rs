//! Read accessors: contract getters mapped onto domain types.

use alloy::primitives::{Address, B256};
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::observability::metrics;
use crate::smc::abi::ISMC;
use crate::smc::handler::SmcHandler;
use crate::smc::types::{CollationHeader, NotaryRecord, Period, ShardId, VoteTally};

/// Contract method name from a call's signature, e.g. `get_vote_count`.
fn method_name<C: SolCall>() -> &'static str {
    C::SIGNATURE.split('(').next().unwrap_or(C::SIGNATURE)
}

/// Map a contract `int128` onto a non-negative domain value.
fn to_u64(method: &'static str, value: i128) -> BlockchainResult<u64> {
    u64::try_from(value).map_err(|_| BlockchainError::Decode {
        method,
        reason: format!("{} is outside 0..=u64::MAX", value),
    })
}

impl SmcHandler {
    /// Run one read-only call and decode its return value.
    async fn query<C>(&self, call: C) -> BlockchainResult<C::Return>
    where
        C: SolCall + Send,
        C::Return: Send,
    {
        let method = method_name::<C>();
        let ctx = self.basic_call_context();
        let result = match self.gateway.call(self.contract, &ctx, call.abi_encode().into()).await {
            Ok(raw) => C::abi_decode_returns(&raw).map_err(|e| BlockchainError::Decode {
                method,
                reason: e.to_string(),
            }),
            Err(e) => Err(e),
        };
        match &result {
            Ok(_) => {
                metrics::record_query(method, "ok");
                tracing::debug!(method, "Registry query");
            }
            Err(e) => {
                metrics::record_query(method, e.kind());
                tracing::debug!(method, error = %e, "Registry query failed");
            }
        }
        result
    }

    async fn query_u64<C>(&self, call: C) -> BlockchainResult<u64>
    where
        C: SolCall<Return = i128> + Send,
    {
        let value = self.query(call).await?;
        to_u64(method_name::<C>(), value)
    }

    pub async fn does_notary_exist(&self, notary: Address) -> BlockchainResult<bool> {
        self.query(ISMC::does_notary_existCall {
            notary_address: notary,
        })
        .await
    }

    /// Pool slot and deregistration period of `notary`.
    pub async fn get_notary_info(&self, notary: Address) -> BlockchainResult<NotaryRecord> {
        let info = self
            .query(ISMC::get_notary_infoCall {
                notary_address: notary,
            })
            .await?;
        Ok(NotaryRecord {
            pool_index: to_u64("get_notary_info", info.pool_index)?,
            deregistered_period: to_u64("get_notary_info", info.deregistered_period)?,
        })
    }

    pub async fn notary_pool_len(&self) -> BlockchainResult<u64> {
        self.query_u64(ISMC::notary_pool_lenCall {}).await
    }

    /// Notary occupying `pool_index`; the zero address for an empty slot.
    pub async fn notary_pool(&self, pool_index: u64) -> BlockchainResult<Address> {
        self.query(ISMC::notary_poolCall {
            pool_index: i128::from(pool_index),
        })
        .await
    }

    pub async fn empty_slots_stack_top(&self) -> BlockchainResult<u64> {
        self.query_u64(ISMC::empty_slots_stack_topCall {}).await
    }

    pub async fn empty_slots_stack(&self, stack_index: u64) -> BlockchainResult<u64> {
        self.query_u64(ISMC::empty_slots_stackCall {
            stack_index: i128::from(stack_index),
        })
        .await
    }

    pub async fn current_period_notary_sample_size(&self) -> BlockchainResult<u64> {
        self.query_u64(ISMC::current_period_notary_sample_sizeCall {}).await
    }

    pub async fn next_period_notary_sample_size(&self) -> BlockchainResult<u64> {
        self.query_u64(ISMC::next_period_notary_sample_sizeCall {}).await
    }

    pub async fn notary_sample_size_updated_period(&self) -> BlockchainResult<Period> {
        self.query_u64(ISMC::notary_sample_size_updated_periodCall {})
            .await
            .map(Period)
    }

    pub async fn records_updated_period(&self, shard_id: ShardId) -> BlockchainResult<Period> {
        self.query_u64(ISMC::records_updated_periodCall {
            shard_id: shard_id.into(),
        })
        .await
        .map(Period)
    }

    pub async fn head_collation_period(&self, shard_id: ShardId) -> BlockchainResult<Period> {
        self.query_u64(ISMC::head_collation_periodCall {
            shard_id: shard_id.into(),
        })
        .await
        .map(Period)
    }

    pub async fn get_member_of_committee(
        &self,
        shard_id: ShardId,
        index: u64,
    ) -> BlockchainResult<Address> {
        self.query(ISMC::get_member_of_committeeCall {
            shard_id: shard_id.into(),
            index: i128::from(index),
        })
        .await
    }

    pub async fn get_collation_chunk_root(
        &self,
        period: Period,
        shard_id: ShardId,
    ) -> BlockchainResult<B256> {
        self.query(ISMC::collation_records__chunk_rootCall {
            period: period.into(),
            shard_id: shard_id.into(),
        })
        .await
    }

    pub async fn get_collation_proposer(
        &self,
        period: Period,
        shard_id: ShardId,
    ) -> BlockchainResult<Address> {
        self.query(ISMC::collation_records__proposerCall {
            period: period.into(),
            shard_id: shard_id.into(),
        })
        .await
    }

    pub async fn get_collation_is_elected(
        &self,
        period: Period,
        shard_id: ShardId,
    ) -> BlockchainResult<bool> {
        self.query(ISMC::collation_records__is_electedCall {
            period: period.into(),
            shard_id: shard_id.into(),
        })
        .await
    }

    /// All recorded header fields for `(period, shard_id)`.
    ///
    /// Three separate reads; the chain may advance between them.
    pub async fn get_collation_header(
        &self,
        period: Period,
        shard_id: ShardId,
    ) -> BlockchainResult<CollationHeader> {
        Ok(CollationHeader {
            period,
            shard_id,
            chunk_root: self.get_collation_chunk_root(period, shard_id).await?,
            proposer: self.get_collation_proposer(period, shard_id).await?,
            is_elected: self.get_collation_is_elected(period, shard_id).await?,
        })
    }

    pub async fn current_vote(&self, shard_id: ShardId) -> BlockchainResult<B256> {
        self.query(ISMC::current_voteCall {
            shard_id: shard_id.into(),
        })
        .await
    }

    pub async fn get_vote_count(&self, shard_id: ShardId) -> BlockchainResult<u64> {
        self.query_u64(ISMC::get_vote_countCall {
            shard_id: shard_id.into(),
        })
        .await
    }

    pub async fn has_notary_voted(&self, shard_id: ShardId, index: u64) -> BlockchainResult<bool> {
        self.query(ISMC::has_notary_votedCall {
            shard_id: shard_id.into(),
            index: i128::from(index),
        })
        .await
    }

    /// Vote hash and count for `shard_id` in the active period.
    pub async fn get_vote_tally(&self, shard_id: ShardId) -> BlockchainResult<VoteTally> {
        let current_vote_hash = self.current_vote(shard_id).await?;
        let vote_count = self.get_vote_count(shard_id).await?;
        Ok(VoteTally::new(shard_id, current_vote_hash, vote_count))
    }
}
