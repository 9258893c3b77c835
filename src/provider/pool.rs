// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint pool: N RPC endpoints behind one logical transport
//!
//! The [`EndpointPool`] turns a [`PoolConfig`] into a single alloy
//! [`RpcClient`] whose transport is a [`FailoverService`]. Providers built
//! from the pool, read-only or signing, route every call through failover.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mintrelay::provider::{EndpointPool, PoolConfig};
//!
//! let pool = EndpointPool::new(
//!     PoolConfig::from_csv("https://rpc.ankr.com/base,https://mainnet.base.org")?
//!         .with_chain_id(8453),
//! )?;
//! pool.verify_chain().await?;
//!
//! let provider = pool.connect_read();
//! let block = provider.get_block_number().await?;
//! ```

use alloy_network::EthereumWallet;
use alloy_primitives::U64;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::BoxTransport;
use alloy_transport_http::Http;
use tower::Layer;
use tracing::{debug, info};

use super::endpoint::PoolConfig;
use crate::errors::{ChainError, ConfigError, MintrelayError};
use crate::transport::{FailoverMember, FailoverService, LoggingLayer};

/// A priority-ordered set of endpoints sharing one failover transport
#[derive(Clone)]
pub struct EndpointPool {
    config: PoolConfig,
    client: RpcClient,
}

impl EndpointPool {
    /// Build HTTP transports for every configured endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the reqwest client cannot be built
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let transports = config
            .endpoints()
            .iter()
            .map(|endpoint| {
                let http = Http::with_client(http_client.clone(), endpoint.url().clone());
                BoxTransport::new(LoggingLayer::new(endpoint.label()).layer(http))
            })
            .collect();

        Self::with_transports(config, transports)
    }

    /// Build a pool over caller-supplied transports, one per configured endpoint.
    ///
    /// Transports are matched to endpoints by position. Extra transports are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoEndpoints`] if no endpoint has a transport
    pub fn with_transports(
        config: PoolConfig,
        transports: Vec<BoxTransport>,
    ) -> Result<Self, ConfigError> {
        let members = config
            .endpoints()
            .iter()
            .zip(transports)
            .map(|(endpoint, transport)| {
                FailoverMember::new(endpoint.label(), endpoint.stall_timeout(), transport)
            })
            .collect::<Vec<_>>();

        let service = FailoverService::new(members).ok_or(ConfigError::NoEndpoints)?;

        info!(
            endpoints = service.len(),
            chain_id = ?config.chain_id(),
            "Endpoint pool ready"
        );

        Ok(Self {
            client: RpcClient::new(service, false),
            config,
        })
    }

    /// The pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The failover RPC client
    pub fn client(&self) -> RpcClient {
        self.client.clone()
    }

    /// A read-only provider over the pool
    pub fn connect_read(&self) -> DynProvider {
        match self.config.chain_id() {
            Some(chain_id) => ProviderBuilder::new()
                .with_chain_id(chain_id)
                .connect_client(self.client())
                .erased(),
            None => ProviderBuilder::new().connect_client(self.client()).erased(),
        }
    }

    /// A provider over the pool that signs with `signer`
    pub fn connect_signer(&self, signer: PrivateKeySigner) -> DynProvider {
        let wallet = EthereumWallet::from(signer);
        match self.config.chain_id() {
            Some(chain_id) => ProviderBuilder::new()
                .with_chain_id(chain_id)
                .wallet(wallet)
                .connect_client(self.client())
                .erased(),
            None => ProviderBuilder::new()
                .wallet(wallet)
                .connect_client(self.client())
                .erased(),
        }
    }

    /// Check the pinned chain id against what the endpoints report.
    ///
    /// Does nothing when no chain id is pinned.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ChainMismatch`] if the reported chain differs
    /// - [`ChainError`] if `eth_chainId` fails on every endpoint
    pub async fn verify_chain(&self) -> Result<(), MintrelayError> {
        let Some(expected) = self.config.chain_id() else {
            return Ok(());
        };

        let actual: U64 = self
            .client
            .request_noparams("eth_chainId")
            .await
            .map_err(|e| ChainError::call_failed("eth_chainId", e))?;
        let actual = actual.to::<u64>();

        if actual != expected {
            return Err(ConfigError::ChainMismatch { expected, actual }.into());
        }

        debug!(chain_id = actual, "Chain id verified");
        Ok(())
    }
}
