//! `smc-client`: command-line access to the sharding manager contract.
//!
//! ```text
//!   config file ──▶ SmcClientConfig ──▶ ClientConfig (defaults)
//!   env key     ──▶ Wallet ─────────────────┐
//!   [rpc]       ──▶ BlockchainClient ──▶ SmcHandler ──▶ JSON on stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};

use smc_client::blockchain::{BlockchainClient, TransactionSigner, TxOverrides, Wallet};
use smc_client::config::{build_client_config, load_config};
use smc_client::observability::{logging, metrics};
use smc_client::smc::{Period, ShardId, SmcCall, SmcHandler};

#[derive(Parser)]
#[command(name = "smc-client")]
#[command(about = "Query and transact with the sharding manager contract", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "smc-client.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct TxArgs {
    /// Gas limit (defaults to DEFAULT_GAS)
    #[arg(long)]
    gas: Option<u64>,
    /// Gas price in wei (defaults to GAS_PRICE)
    #[arg(long)]
    gas_price: Option<u128>,
    /// Explicit nonce (defaults to the next nonce of the signer)
    #[arg(long)]
    nonce: Option<u64>,
    /// EIP-155 chain id (defaults to rpc.chain_id)
    #[arg(long)]
    chain_id: Option<u64>,
}

impl TxArgs {
    fn into_overrides(self) -> TxOverrides {
        TxOverrides {
            nonce: self.nonce,
            gas: self.gas,
            gas_price: self.gas_price,
            chain_id: self.chain_id,
            ..TxOverrides::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check RPC connectivity
    Health,
    /// Show the client address and configured defaults
    Whoami,
    /// Whether an address is a registered notary
    NotaryExists { address: Address },
    /// Pool index and deregistration period of a notary
    NotaryInfo { address: Address },
    /// Size of the notary pool
    PoolLen,
    /// Notary at a pool index
    PoolMember { index: u64 },
    /// Top of the empty-slot stack
    EmptySlotsTop,
    /// Empty-slot stack entry
    EmptySlot { index: u64 },
    /// Current and next period sample sizes
    SampleSize,
    /// Period in which shard records were last updated
    RecordsUpdated { shard_id: u64 },
    /// Period of the shard's head collation
    HeadCollation { shard_id: u64 },
    /// Committee member at an index
    CommitteeMember { shard_id: u64, index: u64 },
    /// Collation header recorded for (period, shard)
    Collation { period: u64, shard_id: u64 },
    /// Vote hash, count and voters for a shard
    Votes { shard_id: u64 },
    /// Whether a committee index has voted
    HasVoted { shard_id: u64, index: u64 },
    /// Register as notary, paying NOTARY_DEPOSIT
    Register(TxArgs),
    /// Deregister as notary
    Deregister(TxArgs),
    /// Release the notary deposit
    Release(TxArgs),
    /// Submit a collation header
    AddHeader {
        period: u64,
        shard_id: u64,
        chunk_root: B256,
        #[command(flatten)]
        tx: TxArgs,
    },
    /// Vote on a collation header
    SubmitVote {
        period: u64,
        shard_id: u64,
        chunk_root: B256,
        index: u64,
        #[command(flatten)]
        tx: TxArgs,
    },
    /// Submit any supported method by name (transaction flags go before the method)
    Send {
        method: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
        #[command(flatten)]
        tx: TxArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let defaults = build_client_config(&config.defaults)?;
    let contract: Address = config.contract.address.parse()?;
    let wallet: Arc<dyn TransactionSigner> = Arc::new(Wallet::from_env()?);
    let client = Arc::new(BlockchainClient::new(config.rpc.clone()).await?);

    tracing::info!(
        contract = %contract,
        rpc_url = %config.rpc.url,
        chain_id = config.rpc.chain_id,
        "Configuration loaded"
    );

    let smc = SmcHandler::new(
        client.clone(),
        contract,
        defaults,
        wallet,
        Some(config.rpc.chain_id),
    );

    let output = run(&smc, &client, cli.command).await?;
    print_json(&output)?;
    Ok(())
}

async fn run(
    smc: &SmcHandler,
    client: &BlockchainClient,
    command: Commands,
) -> Result<Value, Box<dyn std::error::Error>> {
    let value = match command {
        Commands::Health => json!({
            "healthy": client.is_healthy().await,
            "chain_id": client.config().chain_id,
        }),
        Commands::Whoami => {
            let defaults: serde_json::Map<String, Value> = smc
                .config()
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect();
            json!({
                "address": smc.sender_address(),
                "contract": smc.contract_address(),
                "defaults": defaults,
            })
        }
        Commands::NotaryExists { address } => json!(smc.does_notary_exist(address).await?),
        Commands::NotaryInfo { address } => json!(smc.get_notary_info(address).await?),
        Commands::PoolLen => json!(smc.notary_pool_len().await?),
        Commands::PoolMember { index } => json!(smc.notary_pool(index).await?),
        Commands::EmptySlotsTop => json!(smc.empty_slots_stack_top().await?),
        Commands::EmptySlot { index } => json!(smc.empty_slots_stack(index).await?),
        Commands::SampleSize => json!({
            "current": smc.current_period_notary_sample_size().await?,
            "next": smc.next_period_notary_sample_size().await?,
            "updated_period": smc.notary_sample_size_updated_period().await?,
        }),
        Commands::RecordsUpdated { shard_id } => {
            json!(smc.records_updated_period(ShardId(shard_id)).await?)
        }
        Commands::HeadCollation { shard_id } => {
            json!(smc.head_collation_period(ShardId(shard_id)).await?)
        }
        Commands::CommitteeMember { shard_id, index } => {
            json!(smc.get_member_of_committee(ShardId(shard_id), index).await?)
        }
        Commands::Collation { period, shard_id } => {
            json!(smc.get_collation_header(Period(period), ShardId(shard_id)).await?)
        }
        Commands::Votes { shard_id } => {
            let tally = smc.get_vote_tally(ShardId(shard_id)).await?;
            json!({ "tally": tally, "voters": tally.voters() })
        }
        Commands::HasVoted { shard_id, index } => {
            json!(smc.has_notary_voted(ShardId(shard_id), index).await?)
        }
        Commands::Register(tx) => tx_hash(smc.register_notary(tx.into_overrides()).await?),
        Commands::Deregister(tx) => tx_hash(smc.deregister_notary(tx.into_overrides()).await?),
        Commands::Release(tx) => tx_hash(smc.release_notary(tx.into_overrides()).await?),
        Commands::AddHeader {
            period,
            shard_id,
            chunk_root,
            tx,
        } => tx_hash(
            smc.add_header(Period(period), ShardId(shard_id), chunk_root, tx.into_overrides())
                .await?,
        ),
        Commands::SubmitVote {
            period,
            shard_id,
            chunk_root,
            index,
            tx,
        } => tx_hash(
            smc.submit_vote(
                Period(period),
                ShardId(shard_id),
                chunk_root,
                index,
                tx.into_overrides(),
            )
            .await?,
        ),
        Commands::Send { method, args, tx } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let call = SmcCall::parse(&method, &args)?;
            tx_hash(smc.send(&call, tx.into_overrides()).await?)
        }
    };
    Ok(value)
}

fn tx_hash(hash: alloy::primitives::TxHash) -> Value {
    json!({ "tx_hash": hash })
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
