// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line entry point
//!
//! Every flag falls back to an environment variable, and `.env` is loaded
//! first, so a configured `.env` file is enough to run `mintrelay mint`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;

use crate::chain::{AlloyChainClient, ChainClient};
use crate::config::MintConfig;
use crate::discovery::{DiscoveryEngine, DiscoveryReport, HttpPageFetcher, PageFetcher};
use crate::errors::{ConfigError, MintrelayError};
use crate::mint::{load_key_file, run_identities, AuxArgs, IdentityRun, MintMode, MintModeKind};
use crate::probe::CapabilityProber;
use crate::provider::{EndpointPool, PoolConfig};
use crate::types::wei::WeiAmount;

/// Resilient NFT mint submission and contract discovery
#[derive(Parser, Debug)]
#[command(name = "mintrelay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the collectible contract a collection or launchpad page is about
    Detect {
        /// Page URL
        url: String,

        /// Comma-separated RPC endpoints used for probing
        #[arg(long, env = "RPC_URL")]
        rpc_url: String,

        /// Pin the chain id
        #[arg(long, env = "CHAIN_ID")]
        chain_id: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mint with a single key
    Mint {
        #[command(flatten)]
        mint: MintArgs,

        /// Signing key
        #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
    },

    /// Mint with every key in a key file, one after another
    Multi {
        #[command(flatten)]
        mint: MintArgs,

        /// Newline-delimited private keys
        #[arg(long, env = "KEYS_FILE", default_value = "./keys.txt")]
        keys_file: PathBuf,
    },
}

/// Settings shared by `mint` and `multi`
#[derive(Args, Debug, Clone)]
pub struct MintArgs {
    /// Comma-separated RPC endpoints, most preferred first
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Pin the chain id
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Target contract
    #[arg(long, env = "CONTRACT")]
    pub contract: Option<String>,

    /// Contract function name
    #[arg(long, env = "FUNCTION_NAME", default_value = "mint")]
    pub function_name: String,

    /// Tokens per transaction
    #[arg(long, env = "AMOUNT", default_value_t = 1)]
    pub amount: u64,

    /// Price per token in ether
    #[arg(long, env = "PRICE_ETH", default_value = "0")]
    pub price_eth: String,

    /// Gas limit override
    #[arg(long, env = "GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// public, wl-merkle, wl-sig or gtd
    #[arg(long, env = "MINT_MODE", default_value = "public")]
    pub mode: String,

    /// Comma-separated bytes32 proof elements (wl-merkle)
    #[arg(long, env = "MERKLE_PROOF")]
    pub merkle_proof: Option<String>,

    /// Signature hex (wl-sig, gtd)
    #[arg(long, env = "SIGNATURE", default_value = "0x")]
    pub signature: String,

    /// Max-or-nonce integer (gtd)
    #[arg(long, env = "MAX_OR_NONCE", default_value = "0")]
    pub max_or_nonce: String,

    /// Keep retrying after a failed attempt
    #[arg(
        long = "loop",
        env = "LOOP",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub loop_enabled: bool,

    /// Pause between attempts in milliseconds
    #[arg(long, env = "RETRY_DELAY_MS", default_value_t = 3000)]
    pub retry_delay_ms: u64,

    /// Retry through revert-class errors
    #[arg(
        long,
        env = "FORCE_ON_REVERT",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub force_on_revert: bool,

    /// Stall window per endpoint in milliseconds
    #[arg(long, env = "STALL_TIMEOUT_MS", default_value_t = 2000)]
    pub stall_timeout_ms: u64,

    /// Cap on attempts per identity
    #[arg(long, env = "MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,
}

impl MintArgs {
    /// Validate into a [`MintConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for any missing or malformed setting
    pub fn to_config(&self) -> Result<MintConfig, ConfigError> {
        let contract = self
            .contract
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingContract)?;
        let contract = contract
            .parse::<Address>()
            .map_err(|e| ConfigError::invalid_address(contract, e))?;

        let aux = AuxArgs {
            merkle_proof: self.merkle_proof.clone(),
            signature: Some(self.signature.clone()),
            max_or_nonce: Some(self.max_or_nonce.clone()),
        };
        let mode = MintMode::from_kind(self.mode.parse::<MintModeKind>()?, &aux)?;

        let mut builder = MintConfig::builder()
            .rpc_urls(self.rpc_url.as_str())
            .stall_timeout(Duration::from_millis(self.stall_timeout_ms))
            .contract(contract)
            .function_name(self.function_name.as_str())
            .amount(self.amount)
            .price(WeiAmount::from_ether_str(&self.price_eth)?)
            .mode(mode)
            .loop_enabled(self.loop_enabled)
            .retry_delay(Duration::from_millis(self.retry_delay_ms))
            .retry_on_revert(self.force_on_revert);

        if let Some(chain_id) = self.chain_id {
            builder = builder.chain_id(chain_id);
        }
        if let Some(gas_limit) = self.gas_limit {
            builder = builder.gas_limit(gas_limit);
        }
        if let Some(max_attempts) = self.max_attempts {
            builder = builder.max_attempts(max_attempts);
        }

        builder.build()
    }
}

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    match Cli::parse().command {
        Command::Detect {
            url,
            rpc_url,
            chain_id,
            json,
        } => detect(&url, &rpc_url, chain_id, json).await,
        Command::Mint { mint, private_key } => {
            let config = mint.to_config()?;
            let key = private_key
                .filter(|key| !key.trim().is_empty())
                .ok_or(ConfigError::MissingPrivateKey)?;
            mint_all(&[key], &config).await
        }
        Command::Multi { mint, keys_file } => {
            let config = mint.to_config()?;
            let keys = load_key_file(&keys_file).await?;
            info!(keys = keys.len(), file = %keys_file.display(), "Loaded key file");
            mint_all(&keys, &config).await
        }
    }
}

/// Check the pool's chain pin, then discover the contract behind `url` over it.
///
/// # Errors
///
/// Returns [`ConfigError::ChainMismatch`] (as [`MintrelayError::Config`]) when
/// the endpoints serve a different chain than the pinned one. Nothing is
/// fetched or probed in that case.
pub async fn discover_on_pool(
    pool: &EndpointPool,
    fetcher: Arc<dyn PageFetcher>,
    url: &str,
) -> Result<DiscoveryReport, MintrelayError> {
    pool.verify_chain().await?;
    let client: Arc<dyn ChainClient> = Arc::new(AlloyChainClient::read_only(pool));
    let engine = DiscoveryEngine::new(fetcher, CapabilityProber::new(client));
    Ok(engine.discover(url).await)
}

async fn detect(
    url: &str,
    rpc_url: &str,
    chain_id: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = PoolConfig::from_csv(rpc_url)?;
    if let Some(chain_id) = chain_id {
        config = config.with_chain_id(chain_id);
    }
    let pool = EndpointPool::new(config)?;

    let report = discover_on_pool(&pool, Arc::new(HttpPageFetcher::new()?), url).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_discovery(&report);
    }
    Ok(())
}

fn print_discovery(report: &DiscoveryReport) {
    if let Some(error) = &report.fetch_error {
        println!("Could not read page: {error}");
    }
    for (marketplace, addresses) in &report.hints {
        for address in addresses {
            println!("{marketplace} hint: {address}");
        }
    }
    for (rank, candidate) in report.candidates.iter().enumerate() {
        println!(
            "{}. {} {} score={} (seen {}x{})",
            rank + 1,
            candidate.address,
            candidate.standard,
            candidate.score,
            candidate.frequency,
            if candidate.hinted { ", hinted" } else { "" }
        );
    }
    match report.top {
        Some(top) => println!("CONTRACT={top}"),
        None => println!("No collectible contract found"),
    }
}

async fn mint_all(keys: &[String], config: &MintConfig) -> anyhow::Result<()> {
    let pool = EndpointPool::new(config.pool.clone())?;
    pool.verify_chain().await?;

    let runs = run_identities(keys, config, |identity| {
        Arc::new(AlloyChainClient::with_signer(&pool, identity.signer().clone()))
            as Arc<dyn ChainClient>
    })
    .await;

    for run in &runs {
        print_run(run);
    }
    Ok(())
}

fn print_run(run: &IdentityRun) {
    match &run.result {
        Ok(report) => {
            println!(
                "{} {} after {} attempt(s)",
                report.identity, report.final_state, report.attempts
            );
            if let Some(tx_hash) = report.tx_hash {
                println!("  tx: {tx_hash}");
            }
            if let Some(link) = &report.explorer_link {
                println!("  {link}");
            }
            if let Some(error) = &report.last_error {
                println!("  error: {error}");
            }
        }
        Err(e) => println!("{} skipped: {e}", run.key_hint),
    }
}
