// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # mintrelay
//!
//! Resilient NFT mint submission over a pool of RPC endpoints, plus discovery
//! of the collectible contract a web page is about.
//!
//! ## Minting
//!
//! An [`EndpointPool`] wraps every configured endpoint into one failover
//! transport. A [`MintOrchestrator`] runs preflight against it, then submits,
//! waits for the receipt and retries according to a [`RetryPolicy`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mintrelay::{AlloyChainClient, EndpointPool, MintConfig, MintOrchestrator, SigningIdentity};
//!
//! let config = MintConfig::builder()
//!     .rpc_urls("https://rpc.ankr.com/eth,https://eth.llamarpc.com")
//!     .contract(contract)
//!     .build()?;
//! let pool = EndpointPool::new(config.pool.clone())?;
//! let identity = SigningIdentity::from_hex(&key)?;
//! let client = Arc::new(AlloyChainClient::with_signer(&pool, identity.signer().clone()));
//!
//! let report = MintOrchestrator::new(client, &config, identity.address()).run().await;
//! println!("{} after {} attempts", report.final_state, report.attempts);
//! ```
//!
//! ## Discovery
//!
//! A [`DiscoveryEngine`] fetches a page, extracts address-shaped tokens and
//! marketplace hints, drops denylisted addresses, probes the rest on chain
//! and ranks what qualifies.

pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod explorer;
pub mod mint;
pub mod probe;
pub mod provider;
mod spans;
pub mod transport;
pub mod types;

pub use chain::{AlloyChainClient, ChainClient, FeeData};
pub use config::{MintConfig, MintConfigBuilder, RetryPolicy};
pub use discovery::{Candidate, Denylist, DiscoveryEngine, DiscoveryReport, HttpPageFetcher};
pub use errors::{
    ChainError, ChainErrorClass, ConfigError, DiscoveryError, MintError, MintrelayError,
};
pub use mint::{
    run_identities, MintMode, MintModeKind, MintOrchestrator, MintReport, MintState,
    SigningIdentity,
};
pub use probe::{CapabilityProber, TokenStandard};
pub use provider::{Endpoint, EndpointPool, PoolConfig};
pub use types::wei::WeiAmount;
