// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for mint runs
//!
//! [`MintConfig`] gathers everything a mint run needs except the signing
//! keys: endpoints, target contract, call shape, value, and retry policy.
//! Use [`MintConfigBuilder`] to construct validated instances.
//!
//! # Example: Public mint
//!
//! ```rust
//! use alloy_primitives::address;
//! use mintrelay::{MintConfig, WeiAmount};
//!
//! let config = MintConfig::builder()
//!     .rpc_urls("https://rpc.ankr.com/eth,https://eth.llamarpc.com")
//!     .contract(address!("1111111111111111111111111111111111111111"))
//!     .amount(2)
//!     .price(WeiAmount::from_ether_str("0.01").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.value(), WeiAmount::from_ether_str("0.02").unwrap());
//! assert!(config.retry.loop_enabled);
//! ```
//!
//! # Example: Single attempt, no retries
//!
//! ```rust
//! use alloy_primitives::Address;
//! use mintrelay::{MintConfig, RetryPolicy};
//!
//! let config = MintConfig::builder()
//!     .rpc_urls("http://localhost:8545")
//!     .contract(Address::repeat_byte(0x11))
//!     .retry_policy(RetryPolicy::single_attempt())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.retry.max_attempts, Some(1));
//! ```

use std::time::Duration;

use alloy_primitives::Address;

use crate::errors::ConfigError;
use crate::mint::{AttemptOutcome, MintMode};
use crate::provider::PoolConfig;
use crate::types::wei::WeiAmount;

pub mod constants;

use constants::timing::{DEFAULT_RETRY_DELAY, DEFAULT_STALL_TIMEOUT};

/// Default contract function name
pub const DEFAULT_FUNCTION_NAME: &str = "mint";

/// When and how often a failed attempt is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry at all. When false every failure stops the identity.
    /// Default: true
    pub loop_enabled: bool,

    /// Pause before the next attempt
    /// Default: 3000 ms
    pub retry_delay: Duration,

    /// Retry errors classified as revert-class (sold out, paused, not whitelisted)
    /// Default: false
    pub retry_on_revert: bool,

    /// Cap on submission attempts per identity
    /// Default: None (unbounded)
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            loop_enabled: true,
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_on_revert: false,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// One attempt, no retries
    pub fn single_attempt() -> Self {
        Self {
            loop_enabled: false,
            max_attempts: Some(1),
            ..Self::default()
        }
    }

    /// Whether another attempt follows `outcome` after `attempts` attempts.
    ///
    /// - Confirmed: never.
    /// - Reverted receipt: whenever looping is enabled.
    /// - Revert-class error: only with `retry_on_revert`.
    /// - Other errors: whenever looping is enabled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mintrelay::{ChainError, RetryPolicy};
    /// use mintrelay::mint::AttemptOutcome;
    ///
    /// let policy = RetryPolicy::default();
    /// let sold_out = AttemptOutcome::TransportError(ChainError::from_message(
    ///     "eth_estimateGas",
    ///     "execution reverted: Sold out",
    /// ));
    /// let dropped = AttemptOutcome::TransportError(ChainError::from_message(
    ///     "eth_sendRawTransaction",
    ///     "connection reset",
    /// ));
    ///
    /// assert!(!policy.allows_retry(&sold_out, 1));
    /// assert!(policy.allows_retry(&dropped, 1));
    /// ```
    pub fn allows_retry(&self, outcome: &AttemptOutcome, attempts: u32) -> bool {
        if !self.loop_enabled {
            return false;
        }
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        match outcome {
            AttemptOutcome::Confirmed(_) => false,
            AttemptOutcome::Reverted(_) => true,
            AttemptOutcome::TransportError(error) => !error.is_revert() || self.retry_on_revert,
        }
    }
}

/// Settings for minting against one contract
#[derive(Debug, Clone)]
pub struct MintConfig {
    /// RPC endpoints and optional chain pin
    pub pool: PoolConfig,

    /// Target contract
    pub contract: Address,

    /// Contract function to call
    /// Default: "mint"
    pub function_name: String,

    /// Tokens per transaction
    /// Default: 1
    pub amount: u64,

    /// Price per token
    /// Default: 0
    pub price: WeiAmount,

    /// Gas limit override; estimates above it still win
    /// Default: None
    pub gas_limit: Option<u64>,

    /// Submission mode and its arguments
    /// Default: Public
    pub mode: MintMode,

    /// Retry behaviour
    pub retry: RetryPolicy,
}

impl MintConfig {
    /// Start building a config
    pub fn builder() -> MintConfigBuilder {
        MintConfigBuilder::new()
    }

    /// Value sent with each call: price times amount
    pub fn value(&self) -> WeiAmount {
        self.price.times(self.amount)
    }
}

/// Builder for [`MintConfig`]
#[derive(Debug, Clone)]
pub struct MintConfigBuilder {
    rpc_urls: String,
    chain_id: Option<u64>,
    stall_timeout: Duration,
    contract: Option<Address>,
    function_name: String,
    amount: u64,
    price: WeiAmount,
    gas_limit: Option<u64>,
    mode: MintMode,
    retry: RetryPolicy,
}

impl Default for MintConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MintConfigBuilder {
    /// Builder with defaults and no endpoints or contract
    pub fn new() -> Self {
        Self {
            rpc_urls: String::new(),
            chain_id: None,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
            contract: None,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            amount: 1,
            price: WeiAmount::ZERO,
            gas_limit: None,
            mode: MintMode::Public,
            retry: RetryPolicy::default(),
        }
    }

    /// Comma-separated endpoint URLs, most preferred first
    pub fn rpc_urls(mut self, urls: impl Into<String>) -> Self {
        self.rpc_urls = urls.into();
        self
    }

    /// Pin the chain id
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Stall window per endpoint
    pub fn stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    /// Target contract
    pub fn contract(mut self, contract: Address) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Contract function name; blank keeps the default
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.function_name = name.trim().to_string();
        }
        self
    }

    /// Tokens per transaction
    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    /// Price per token
    pub fn price(mut self, price: WeiAmount) -> Self {
        self.price = price;
        self
    }

    /// Gas limit override
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Submission mode
    pub fn mode(mut self, mode: MintMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the whole retry policy
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable retries
    pub fn loop_enabled(mut self, enabled: bool) -> Self {
        self.retry.loop_enabled = enabled;
        self
    }

    /// Pause between attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry.retry_delay = delay;
        self
    }

    /// Keep retrying through revert-class errors
    pub fn retry_on_revert(mut self, retry: bool) -> Self {
        self.retry.retry_on_revert = retry;
        self
    }

    /// Cap attempts per identity
    pub fn max_attempts(mut self, max: u32) -> Self {
        self.retry.max_attempts = Some(max);
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoEndpoints`] / [`ConfigError::InvalidEndpointUrl`] for bad endpoints
    /// - [`ConfigError::MissingContract`] when no contract was set
    pub fn build(self) -> Result<MintConfig, ConfigError> {
        let mut pool = PoolConfig::from_csv(&self.rpc_urls)?.with_stall_timeout(self.stall_timeout);
        if let Some(chain_id) = self.chain_id {
            pool = pool.with_chain_id(chain_id);
        }

        let contract = self.contract.ok_or(ConfigError::MissingContract)?;

        Ok(MintConfig {
            pool,
            contract,
            function_name: self.function_name,
            amount: self.amount,
            price: self.price,
            gas_limit: self.gas_limit,
            mode: self.mode,
            retry: self.retry,
        })
    }
}
