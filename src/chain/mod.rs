// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain access used by probing, preflight and submission
//!
//! Everything that touches the network goes through [`ChainClient`]. The
//! production implementation, [`AlloyChainClient`], is an alloy provider over
//! the failover [`EndpointPool`](crate::provider::EndpointPool).

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::errors::ChainError;
use crate::mint::MintCall;

mod alloy;

pub use self::alloy::AlloyChainClient;

/// Fee fields reported by the network, each optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeData {
    /// EIP-1559 max fee per gas in wei
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee per gas in wei
    pub max_priority_fee_per_gas: Option<u128>,
    /// Legacy gas price in wei
    pub gas_price: Option<u128>,
}

/// Read, estimate, broadcast and confirm operations against one chain
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance of `address`
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Current fee data.
    ///
    /// Fields the network does not report are left unset; an empty
    /// [`FeeData`] means the caller prices at its fee floor.
    async fn fee_data(&self) -> Result<FeeData, ChainError>;

    /// Read-only call returning raw return data
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError>;

    /// Gas estimate for `call`
    async fn estimate_gas(&self, call: &MintCall) -> Result<u64, ChainError>;

    /// Sign and broadcast `call`, returning its hash
    async fn send_transaction(&self, call: &MintCall) -> Result<TxHash, ChainError>;

    /// Wait until `tx_hash` is mined; `true` when the receipt reports success.
    ///
    /// A wait that outlasts the client's receipt timeout is an error.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<bool, ChainError>;
}
