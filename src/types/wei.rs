// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for native currency amounts
//!
//! Balances, mint values and gas budgets are all native currency in wei. The
//! newtype keeps them apart from token counts and gas units.

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    U256,
};
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::errors::ConfigError;

/// Represents an amount of native currency (ETH, MATIC, etc.) in wei
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use mintrelay::WeiAmount;
///
/// let price = WeiAmount::from_ether_str("0.01").unwrap();
/// let value = price.times(2);
/// assert_eq!(value.as_u256(), U256::from(20_000_000_000_000_000u64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct WeiAmount(U256);

impl WeiAmount {
    /// Zero wei amount
    pub const ZERO: Self = Self(U256::ZERO);

    /// Create a new wei amount
    pub const fn new(wei: U256) -> Self {
        Self(wei)
    }

    /// Parse a decimal ether string such as `"0.05"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if the string is not a
    /// non-negative decimal with at most 18 fractional digits.
    pub fn from_ether_str(ether: &str) -> Result<Self, ConfigError> {
        parse_ether(ether.trim())
            .map(Self)
            .map_err(|_| ConfigError::invalid_number("price", ether))
    }

    /// Amount of gas units at a per-unit fee.
    pub fn gas_cost(gas_limit: u64, fee_per_gas: u128) -> Self {
        Self(U256::from(gas_limit).saturating_mul(U256::from(fee_per_gas)))
    }

    /// Get the inner U256 value (in wei)
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiply by a whole count, saturating at `U256::MAX`.
    pub fn times(&self, count: u64) -> Self {
        Self(self.0.saturating_mul(U256::from(count)))
    }

    /// Exact decimal ether rendering.
    pub fn to_ether_string(&self) -> String {
        format_ether(self.0)
    }
}

impl From<u64> for WeiAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for WeiAmount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for WeiAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl Add for WeiAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::fmt::Display for WeiAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ETH", self.to_ether_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wei_amount_zero() {
        assert!(WeiAmount::ZERO.is_zero());
        assert_eq!(WeiAmount::ZERO.as_u256(), U256::ZERO);
    }

    #[test]
    fn test_saturating_addition() {
        let max_amount = WeiAmount::new(U256::MAX);
        let small_amount = WeiAmount::from(1u64);
        assert_eq!((max_amount + small_amount).as_u256(), U256::MAX);
    }

    #[test]
    fn test_from_ether_str() {
        let amount = WeiAmount::from_ether_str("1.5").unwrap();
        assert_eq!(
            amount.as_u256(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert!(WeiAmount::from_ether_str("0").unwrap().is_zero());
        assert!(WeiAmount::from_ether_str("abc").is_err());
    }

    #[test]
    fn test_gas_cost_scenario() {
        // 96,000 gas at 10 gwei = 0.00096 ETH
        let cost = WeiAmount::gas_cost(96_000, 10_000_000_000);
        assert_eq!(cost.as_u256(), U256::from(960_000_000_000_000u64));
    }

    #[test]
    fn test_times_and_display() {
        let price = WeiAmount::from_ether_str("0.01").unwrap();
        let display = price.times(2).to_string();
        assert!(display.starts_with("0.02"));
        assert!(display.ends_with("ETH"));
    }

    #[test]
    fn test_ordering() {
        let small = WeiAmount::from(100u64);
        let large = WeiAmount::from(1000u64);
        assert!(small < large);
    }

    #[test]
    fn test_serialization() {
        let amount = WeiAmount::from(1000u64);
        let json = serde_json::to_string(&amount).unwrap();
        let deserialized: WeiAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(amount, deserialized);
    }
}
