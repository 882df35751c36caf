// src/main.rs
use anyhow::{Context, Result as AnyhowResult};
use b2stake_client::{AddPool, Config, StakeClient, api, logging, transaction, utils};
use clap::{Args, Parser, Subcommand};
use ethers::signers::Signer;
use ethers::types::U256;
use ethers::utils::to_checksum;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "b2stake")]
#[command(about = "Query and drive a deployed B2Stake staking contract", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a pool record
    Pool { pid: u64 },

    /// Print a user's record in a pool
    User { address: String, pid: u64 },

    /// Print the pending reward of a user in a pool
    Reward { pid: u64, address: String },

    /// Register a new staking pool (admin only)
    AddPool {
        pid: u64,
        pool_address: String,
        #[arg(value_parser = parse_u256)]
        weight: U256,
        #[arg(value_parser = parse_u256)]
        min_deposit: U256,
        #[arg(value_parser = parse_u256)]
        unstake_locked_blocks: U256,
        #[arg(value_parser = parse_u256)]
        reward_per_block: U256,
        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Stake into a pool
    Stake {
        pid: u64,
        #[arg(value_parser = parse_u256)]
        amount: U256,
        #[command(flatten)]
        signer: SignerArgs,
    },

    /// Serve the read operations over HTTP
    Serve,
}

#[derive(Args)]
struct SignerArgs {
    /// Hex private key used to sign locally
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Sender address; defaults to the key's address
    #[arg(long)]
    from: Option<String>,
}

impl SignerArgs {
    fn from_address(&self, chain_id: u64) -> AnyhowResult<String> {
        match &self.from {
            Some(from) => Ok(from.clone()),
            None => {
                let wallet = transaction::parse_signer(&self.private_key, chain_id)?;
                Ok(to_checksum(&wallet.address(), None))
            }
        }
    }
}

fn parse_u256(raw: &str) -> Result<U256, String> {
    U256::from_dec_str(raw).map_err(|e| format!("not a decimal integer: {e}"))
}

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();

    logging::init();

    let config = Config::from_env()?;
    let client = StakeClient::from_config(&config)
        .await
        .with_context(|| format!("connecting to {}", config.rpc_url))?;

    match cli.command {
        Commands::Pool { pid } => {
            let pool = client.read_pool(pid).await?;
            println!("Pool Info: {pool}");
        }
        Commands::User { address, pid } => {
            let user = client.read_user(&address, pid).await?;
            println!("User Info: {user}");
        }
        Commands::Reward { pid, address } => {
            let reward = client.calculate_reward(pid, &address).await?;
            println!(
                "Reward for {} in pool {pid}: {reward}",
                utils::normalize_address(&address)?
            );
        }
        Commands::AddPool {
            pid,
            pool_address,
            weight,
            min_deposit,
            unstake_locked_blocks,
            reward_per_block,
            signer,
        } => {
            let from = signer.from_address(client.chain_id())?;
            let pool = AddPool {
                pid,
                pool_address,
                weight,
                min_deposit,
                unstake_lock_blocks: unstake_locked_blocks,
                reward_per_block,
            };
            let tx_hash = client
                .submit_add_pool(&pool, &signer.private_key, &from)
                .await?;
            println!("Transaction hash: {tx_hash:#x}");
        }
        Commands::Stake {
            pid,
            amount,
            signer,
        } => {
            let from = signer.from_address(client.chain_id())?;
            let tx_hash = client
                .submit_stake(pid, amount, &signer.private_key, &from)
                .await?;
            println!("Transaction hash: {tx_hash:#x}");
        }
        Commands::Serve => {
            let app = api::router(Arc::new(client));
            let listener = TcpListener::bind(config.bind_addr).await?;
            info!(addr = %config.bind_addr, "Serving read API");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
