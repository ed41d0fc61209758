//! Registry read accessors against the stub gateway.

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use smc_client::blockchain::{BlockchainError, TransactionSigner};
use smc_client::smc::abi::ISMC;
use smc_client::smc::{CollationHeader, NotaryRecord, Period, ShardId};

mod common;
use common::{
    concat, handler, word_address, word_b256, word_bool, word_minus_one, word_u64,
    RecordingSigner, StubGateway, TEST_PRIVATE_KEY,
};

#[tokio::test]
async fn test_does_notary_exist_has_no_side_effects() {
    let gateway = StubGateway::mining(5);
    let signer = RecordingSigner::new(TEST_PRIVATE_KEY);
    let smc = handler(gateway.clone(), signer.clone());
    gateway.respond::<ISMC::does_notary_existCall>(word_bool(true));

    let notary = Address::repeat_byte(0xaa);
    assert!(smc.does_notary_exist(notary).await.unwrap());

    assert_eq!(gateway.nonce_lookup_count(), 0);
    assert_eq!(signer.sign_count(), 0);
    assert!(gateway.submitted().is_empty());

    let calls = gateway.calls.lock().unwrap();
    let (contract, ctx, data) = &calls[0];
    assert_eq!(*contract, common::contract_address());
    assert_eq!(ctx.sender, signer.address());
    assert_eq!(ctx.gas_limit, 200_000);
    assert_eq!(
        data.as_ref(),
        ISMC::does_notary_existCall {
            notary_address: notary
        }
        .abi_encode()
        .as_slice()
    );
}

#[tokio::test]
async fn test_notary_info_maps_to_record() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    // (deregistered_period, pool_index)
    gateway.respond::<ISMC::get_notary_infoCall>(concat(&[word_u64(0), word_u64(12)]));

    let record = smc.get_notary_info(Address::repeat_byte(1)).await.unwrap();
    assert_eq!(
        record,
        NotaryRecord {
            pool_index: 12,
            deregistered_period: 0,
        }
    );
    assert!(!record.is_deregistered());
}

#[tokio::test]
async fn test_pool_and_sample_accessors() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    let member = Address::repeat_byte(0x33);
    gateway.respond::<ISMC::notary_pool_lenCall>(word_u64(4));
    gateway.respond::<ISMC::notary_poolCall>(word_address(member));
    gateway.respond::<ISMC::empty_slots_stack_topCall>(word_u64(1));
    gateway.respond::<ISMC::empty_slots_stackCall>(word_u64(2));
    gateway.respond::<ISMC::current_period_notary_sample_sizeCall>(word_u64(3));
    gateway.respond::<ISMC::next_period_notary_sample_sizeCall>(word_u64(4));
    gateway.respond::<ISMC::notary_sample_size_updated_periodCall>(word_u64(8));

    assert_eq!(smc.notary_pool_len().await.unwrap(), 4);
    assert_eq!(smc.notary_pool(2).await.unwrap(), member);
    assert_eq!(smc.empty_slots_stack_top().await.unwrap(), 1);
    assert_eq!(smc.empty_slots_stack(0).await.unwrap(), 2);
    assert_eq!(smc.current_period_notary_sample_size().await.unwrap(), 3);
    assert_eq!(smc.next_period_notary_sample_size().await.unwrap(), 4);
    assert_eq!(smc.notary_sample_size_updated_period().await.unwrap(), Period(8));
    assert_eq!(gateway.call_count(), 7);
}

#[tokio::test]
async fn test_shard_and_committee_accessors() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    let member = Address::repeat_byte(0x44);
    gateway.respond::<ISMC::records_updated_periodCall>(word_u64(6));
    gateway.respond::<ISMC::head_collation_periodCall>(word_u64(5));
    gateway.respond::<ISMC::get_member_of_committeeCall>(word_address(member));
    gateway.respond::<ISMC::has_notary_votedCall>(word_bool(false));

    assert_eq!(smc.records_updated_period(ShardId(1)).await.unwrap(), Period(6));
    assert_eq!(smc.head_collation_period(ShardId(1)).await.unwrap(), Period(5));
    assert_eq!(smc.get_member_of_committee(ShardId(1), 3).await.unwrap(), member);
    assert!(!smc.has_notary_voted(ShardId(1), 3).await.unwrap());

    let calls = gateway.calls.lock().unwrap();
    let (_, _, data) = &calls[2];
    assert_eq!(&data[..4], &ISMC::get_member_of_committeeCall::SELECTOR);
    assert_eq!(U256::from_be_slice(&data[4..36]), U256::from(1u64));
    assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(3u64));
}

#[tokio::test]
async fn test_collation_header() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    let root = B256::repeat_byte(0x77);
    let proposer = Address::repeat_byte(0x88);
    gateway.respond::<ISMC::collation_records__chunk_rootCall>(word_b256(root));
    gateway.respond::<ISMC::collation_records__proposerCall>(word_address(proposer));
    gateway.respond::<ISMC::collation_records__is_electedCall>(word_bool(true));

    let header = smc.get_collation_header(Period(10), ShardId(2)).await.unwrap();
    assert_eq!(
        header,
        CollationHeader {
            period: Period(10),
            shard_id: ShardId(2),
            chunk_root: root,
            proposer,
            is_elected: true,
        }
    );
    assert_eq!(gateway.call_count(), 3);
}

#[tokio::test]
async fn test_vote_tally() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    let mut raw = [0u8; 32];
    raw[0] = 0b1010_0000; // indices 0 and 2
    raw[31] = 2;
    let vote = B256::from(raw);
    gateway.respond::<ISMC::current_voteCall>(word_b256(vote));
    gateway.respond::<ISMC::get_vote_countCall>(word_u64(2));

    let tally = smc.get_vote_tally(ShardId(4)).await.unwrap();
    assert_eq!(tally.shard_id, ShardId(4));
    assert_eq!(tally.current_vote_hash, vote);
    assert_eq!(tally.vote_count, 2);
    assert_eq!(tally.voters(), vec![0, 2]);
    assert!(tally.has_voted(2));
    assert!(!tally.has_voted(1));
}

#[tokio::test]
async fn test_negative_value_is_decode_error() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    gateway.respond::<ISMC::get_vote_countCall>(word_minus_one());

    let err = smc.get_vote_count(ShardId(0)).await.unwrap_err();
    assert!(matches!(err, BlockchainError::Decode { method: "get_vote_count", .. }));
}

#[tokio::test]
async fn test_short_return_data_is_decode_error() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));
    gateway.respond::<ISMC::notary_pool_lenCall>(vec![0u8; 3]);

    let err = smc.notary_pool_len().await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_remote_failure_is_remote_call_error() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));

    // nothing canned: the stub reverts
    let err = smc.head_collation_period(ShardId(9)).await.unwrap_err();
    assert!(matches!(err, BlockchainError::RemoteCall(_)));
}

#[tokio::test]
async fn test_queries_are_never_cached() {
    let gateway = StubGateway::mining(0);
    let smc = handler(gateway.clone(), RecordingSigner::new(TEST_PRIVATE_KEY));

    gateway.respond::<ISMC::notary_pool_lenCall>(word_u64(1));
    assert_eq!(smc.notary_pool_len().await.unwrap(), 1);

    gateway.respond::<ISMC::notary_pool_lenCall>(word_u64(2));
    assert_eq!(smc.notary_pool_len().await.unwrap(), 2);
    assert_eq!(gateway.call_count(), 2);
}
