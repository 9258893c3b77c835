// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors from preflight validation and mint submission.

use super::{ChainError, ConfigError};
use crate::types::wei::WeiAmount;

/// Errors that end processing for a single signing identity.
///
/// These never abort a multi-identity run; the runner records them and moves
/// on to the next key.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// Configuration problem detected before any network call.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A read needed by preflight failed.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Balance does not cover value plus gas. Never retried.
    #[error("Insufficient balance: need ~{required} (value + gas), have {balance}")]
    InsufficientFunds {
        /// Value to transfer plus gas limit times fee per gas
        required: WeiAmount,
        /// Current balance of the signing identity
        balance: WeiAmount,
    },
}

impl MintError {
    /// Create an `InsufficientFunds` error.
    pub fn insufficient_funds(required: impl Into<WeiAmount>, balance: impl Into<WeiAmount>) -> Self {
        MintError::InsufficientFunds {
            required: required.into(),
            balance: balance.into(),
        }
    }
}
