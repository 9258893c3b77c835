// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Preflight: can this identity afford the mint?
//!
//! Read-only. Balance and fee data are fetched concurrently, the fee is
//! resolved, gas is estimated with the exact call that will be sent, and the
//! total cost is compared with the balance. No value-bearing transaction is
//! ever sent from here.

use std::sync::Arc;

use alloy_primitives::Address;
use serde::Serialize;
use tracing::{debug, warn, Instrument};

use super::mode::{GasFee, MintCallBuilder, Overrides};
use crate::chain::{ChainClient, FeeData};
use crate::config::constants::gas::{
    DEFAULT_GAS_LIMIT, DEFAULT_PRIORITY_FEE_WEI, FEE_FLOOR_WEI, GAS_HEADROOM_PERCENT,
};
use crate::errors::ChainError;
use crate::spans;
use crate::types::wei::WeiAmount;

/// Outcome of preflight validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreflightReport {
    /// Current balance of the identity
    pub balance: WeiAmount,
    /// Value sent with the call
    pub value: WeiAmount,
    /// `value + gas_limit * fee per gas`
    pub required_total: WeiAmount,
    /// Gas limit to submit with
    pub gas_limit: u64,
    /// Raw network estimate, when estimation succeeded
    pub estimated_gas: Option<u64>,
    /// Fee to submit with
    #[serde(skip)]
    pub fee: GasFee,
    /// `balance >= required_total`
    pub feasible: bool,
}

impl PreflightReport {
    /// Overrides for the real submission
    pub fn submission_overrides(&self) -> Overrides {
        Overrides::new(self.value)
            .with_gas_limit(self.gas_limit)
            .with_fee(self.fee)
    }
}

/// Pick the fee per gas: dynamic max fee, then legacy gas price, then the floor.
///
/// The priority fee is the network suggestion or 1.5 gwei, never above the max fee.
///
/// # Examples
///
/// ```rust
/// use mintrelay::chain::FeeData;
/// use mintrelay::mint::{resolve_fee, GasFee};
///
/// let fee = resolve_fee(&FeeData { gas_price: Some(7), ..Default::default() });
/// assert_eq!(fee, GasFee::Legacy { gas_price: 7 });
/// ```
pub fn resolve_fee(fee_data: &FeeData) -> GasFee {
    let eip1559 = |max_fee_per_gas: u128| GasFee::Eip1559 {
        max_fee_per_gas,
        max_priority_fee_per_gas: fee_data
            .max_priority_fee_per_gas
            .unwrap_or(DEFAULT_PRIORITY_FEE_WEI)
            .min(max_fee_per_gas),
    };

    match (fee_data.max_fee_per_gas, fee_data.gas_price) {
        (Some(max_fee_per_gas), _) => eip1559(max_fee_per_gas),
        (None, Some(gas_price)) => GasFee::Legacy { gas_price },
        (None, None) => eip1559(FEE_FLOOR_WEI),
    }
}

/// Pick the gas limit: the larger of the override and estimate plus headroom,
/// else the override, else the default.
pub fn resolve_gas_limit(estimate: Option<u64>, override_limit: Option<u64>) -> u64 {
    match (estimate, override_limit) {
        (Some(estimate), override_limit) => {
            let padded = estimate.saturating_mul(GAS_HEADROOM_PERCENT) / 100;
            override_limit.map_or(padded, |limit| limit.max(padded))
        }
        (None, Some(limit)) => limit,
        (None, None) => DEFAULT_GAS_LIMIT,
    }
}

/// Read-only affordability check
#[derive(Clone)]
pub struct PreflightValidator {
    client: Arc<dyn ChainClient>,
}

impl PreflightValidator {
    /// Validator over `client`
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Validate `builder`'s call for `identity` sending `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the balance or fee data cannot be read. A
    /// failed gas estimate is not an error; it falls back silently.
    pub async fn validate(
        &self,
        builder: &MintCallBuilder,
        identity: Address,
        value: WeiAmount,
        gas_limit_override: Option<u64>,
    ) -> Result<PreflightReport, ChainError> {
        async {
            let (balance, fee_data) =
                tokio::try_join!(self.client.balance(identity), self.client.fee_data())?;
            let balance = WeiAmount::from(balance);
            let fee = resolve_fee(&fee_data);

            let estimate_overrides = Overrides::new(value).with_fee(fee);
            let estimated_gas = match builder
                .estimate(self.client.as_ref(), &estimate_overrides)
                .await
            {
                Ok(estimate) => Some(estimate),
                Err(e) => {
                    warn!(error = %e, "Gas estimation failed, using fallback gas limit");
                    None
                }
            };

            let gas_limit = resolve_gas_limit(estimated_gas, gas_limit_override);
            let required_total = value + WeiAmount::gas_cost(gas_limit, fee.per_gas());
            let feasible = balance >= required_total;

            debug!(
                %balance,
                %required_total,
                gas_limit,
                ?estimated_gas,
                feasible,
                "Preflight complete"
            );

            Ok(PreflightReport {
                balance,
                value,
                required_total,
                gas_limit,
                estimated_gas,
                fee,
                feasible,
            })
        }
        .instrument(spans::preflight(identity))
        .await
    }
}
