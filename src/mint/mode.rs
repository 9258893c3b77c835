// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Submission modes and mint call construction
//!
//! Each [`MintMode`] variant carries exactly the auxiliary arguments its
//! contract function takes, and maps to one fixed positional shape:
//!
//! | Mode | Solidity shape |
//! |---|---|
//! | `Public` | `fn(uint256 amount)` |
//! | `WhitelistMerkle` | `fn(uint256 amount, bytes32[] proof)` |
//! | `WhitelistSignature` | `fn(uint256 amount, bytes signature)` |
//! | `Guaranteed` | `fn(uint256 amount, uint256 maxOrNonce, bytes signature)` |
//!
//! [`MintCallBuilder`] produces the same [`MintCall`] for gas estimation and
//! for submission, so the estimate always reflects what is sent.

use std::fmt;
use std::str::FromStr;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, keccak256, Address, Bytes, TxHash, B256, U256};

use crate::chain::ChainClient;
use crate::errors::{ChainError, ConfigError};
use crate::types::wei::WeiAmount;

/// The four supported submission modes, without their arguments.
///
/// # Examples
///
/// ```rust
/// use mintrelay::mint::MintModeKind;
///
/// let kind: MintModeKind = "wl-sig".parse().unwrap();
/// assert_eq!(kind, MintModeKind::WhitelistSignature);
/// assert!("presale".parse::<MintModeKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MintModeKind {
    /// `public`
    #[default]
    Public,
    /// `wl-merkle`
    WhitelistMerkle,
    /// `wl-sig`
    WhitelistSignature,
    /// `gtd`
    Guaranteed,
}

impl MintModeKind {
    /// The configuration spelling of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            MintModeKind::Public => "public",
            MintModeKind::WhitelistMerkle => "wl-merkle",
            MintModeKind::WhitelistSignature => "wl-sig",
            MintModeKind::Guaranteed => "gtd",
        }
    }
}

impl FromStr for MintModeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(MintModeKind::Public),
            "wl-merkle" => Ok(MintModeKind::WhitelistMerkle),
            "wl-sig" => Ok(MintModeKind::WhitelistSignature),
            "gtd" => Ok(MintModeKind::Guaranteed),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for MintModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merkle proof for whitelist mints
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MerkleProof(pub Vec<B256>);

/// Arguments of a signature-gated whitelist mint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureArgs {
    /// Allowlist signature, possibly empty
    pub signature: Bytes,
}

/// Arguments of a guaranteed-allocation mint
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuaranteedArgs {
    /// Allocation cap or nonce, defaults to 0
    pub max_or_nonce: U256,
    /// Allocation signature, defaults to empty
    pub signature: Bytes,
}

/// Raw auxiliary inputs as they come from configuration.
///
/// Only the fields relevant to the selected mode are parsed; the rest are ignored.
#[derive(Debug, Clone, Default)]
pub struct AuxArgs {
    /// Comma-separated 32-byte hex values
    pub merkle_proof: Option<String>,
    /// Hex signature, with or without `0x`
    pub signature: Option<String>,
    /// Decimal or `0x` hex integer
    pub max_or_nonce: Option<String>,
}

/// Submission mode with the arguments it requires
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MintMode {
    /// `fn(uint256)`
    #[default]
    Public,
    /// `fn(uint256,bytes32[])`
    WhitelistMerkle(MerkleProof),
    /// `fn(uint256,bytes)`
    WhitelistSignature(SignatureArgs),
    /// `fn(uint256,uint256,bytes)`
    Guaranteed(GuaranteedArgs),
}

impl MintMode {
    /// Build a mode from its kind, parsing only the auxiliary fields it uses.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a relevant field is malformed. Fields the
    /// mode does not use are never inspected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mintrelay::mint::{AuxArgs, MintMode, MintModeKind};
    ///
    /// let aux = AuxArgs {
    ///     merkle_proof: Some("not hex at all".into()),
    ///     ..Default::default()
    /// };
    /// // The proof is irrelevant to a public mint and is ignored.
    /// assert_eq!(MintMode::from_kind(MintModeKind::Public, &aux).unwrap(), MintMode::Public);
    /// assert!(MintMode::from_kind(MintModeKind::WhitelistMerkle, &aux).is_err());
    /// ```
    pub fn from_kind(kind: MintModeKind, aux: &AuxArgs) -> Result<Self, ConfigError> {
        Ok(match kind {
            MintModeKind::Public => MintMode::Public,
            MintModeKind::WhitelistMerkle => {
                MintMode::WhitelistMerkle(parse_proof(aux.merkle_proof.as_deref().unwrap_or(""))?)
            }
            MintModeKind::WhitelistSignature => MintMode::WhitelistSignature(SignatureArgs {
                signature: parse_signature(aux.signature.as_deref().unwrap_or(""))?,
            }),
            MintModeKind::Guaranteed => MintMode::Guaranteed(GuaranteedArgs {
                max_or_nonce: parse_max_or_nonce(aux.max_or_nonce.as_deref().unwrap_or(""))?,
                signature: parse_signature(aux.signature.as_deref().unwrap_or(""))?,
            }),
        })
    }

    /// The kind of this mode
    pub fn kind(&self) -> MintModeKind {
        match self {
            MintMode::Public => MintModeKind::Public,
            MintMode::WhitelistMerkle(_) => MintModeKind::WhitelistMerkle,
            MintMode::WhitelistSignature(_) => MintModeKind::WhitelistSignature,
            MintMode::Guaranteed(_) => MintModeKind::Guaranteed,
        }
    }

    /// Solidity signature of `function_name` in this mode's shape
    pub fn function_signature(&self, function_name: &str) -> String {
        let params = match self {
            MintMode::Public => "uint256",
            MintMode::WhitelistMerkle(_) => "uint256,bytes32[]",
            MintMode::WhitelistSignature(_) => "uint256,bytes",
            MintMode::Guaranteed(_) => "uint256,uint256,bytes",
        };
        format!("{function_name}({params})")
    }

    /// Positional arguments in this mode's shape
    pub fn arguments(&self, amount: U256) -> Vec<DynSolValue> {
        let amount = DynSolValue::Uint(amount, 256);
        match self {
            MintMode::Public => vec![amount],
            MintMode::WhitelistMerkle(MerkleProof(proof)) => vec![
                amount,
                DynSolValue::Array(
                    proof
                        .iter()
                        .map(|node| DynSolValue::FixedBytes(*node, 32))
                        .collect(),
                ),
            ],
            MintMode::WhitelistSignature(args) => {
                vec![amount, DynSolValue::Bytes(args.signature.to_vec())]
            }
            MintMode::Guaranteed(args) => vec![
                amount,
                DynSolValue::Uint(args.max_or_nonce, 256),
                DynSolValue::Bytes(args.signature.to_vec()),
            ],
        }
    }
}

fn parse_proof(csv: &str) -> Result<MerkleProof, ConfigError> {
    csv.split(',')
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .map(|node| {
            node.parse::<B256>()
                .map_err(|_| ConfigError::InvalidProof(node.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(MerkleProof)
}

fn parse_signature(raw: &str) -> Result<Bytes, ConfigError> {
    hex::decode(raw.trim())
        .map(Bytes::from)
        .map_err(|_| ConfigError::InvalidSignature(raw.to_string()))
}

fn parse_max_or_nonce(raw: &str) -> Result<U256, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str(raw).map_err(|_| ConfigError::invalid_number("max_or_nonce", raw))
}

/// Fee per gas attached to a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasFee {
    /// EIP-1559 fee fields
    Eip1559 {
        /// Max fee per gas in wei
        max_fee_per_gas: u128,
        /// Max priority fee per gas in wei, never above the max fee
        max_priority_fee_per_gas: u128,
    },
    /// Legacy gas price in wei
    Legacy {
        /// Gas price in wei
        gas_price: u128,
    },
}

impl GasFee {
    /// The most the sender may pay per gas unit
    pub fn per_gas(&self) -> u128 {
        match self {
            GasFee::Eip1559 {
                max_fee_per_gas, ..
            } => *max_fee_per_gas,
            GasFee::Legacy { gas_price } => *gas_price,
        }
    }
}

/// Value and fee overrides appended to every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overrides {
    /// Native value sent with the call
    pub value: WeiAmount,
    /// Gas limit, left to the network when unset
    pub gas_limit: Option<u64>,
    /// Fee per gas, left to the network when unset
    pub fee: Option<GasFee>,
}

impl Overrides {
    /// Overrides carrying only a value
    pub fn new(value: WeiAmount) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Set the gas limit
    #[must_use]
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set the fee
    #[must_use]
    pub fn with_fee(mut self, fee: GasFee) -> Self {
        self.fee = Some(fee);
        self
    }
}

/// A fully encoded contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintCall {
    /// Sender
    pub from: Address,
    /// Contract
    pub to: Address,
    /// Solidity signature the calldata was encoded against
    pub signature: String,
    /// Selector plus ABI-encoded arguments
    pub input: Bytes,
    /// Native value in wei
    pub value: U256,
    /// Gas limit, if set
    pub gas_limit: Option<u64>,
    /// Fee per gas, if set
    pub fee: Option<GasFee>,
}

/// What to do with a built call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallIntent {
    /// Ask the network for a gas estimate only
    Estimate,
    /// Sign and broadcast
    Submit,
}

/// Result of executing a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// Estimated gas units
    GasEstimate(u64),
    /// Broadcast transaction hash
    Pending(TxHash),
}

/// Builds the mint call for one identity, contract and mode
#[derive(Debug, Clone)]
pub struct MintCallBuilder {
    from: Address,
    contract: Address,
    function_name: String,
    amount: U256,
    mode: MintMode,
}

impl MintCallBuilder {
    /// Create a builder
    pub fn new(
        from: Address,
        contract: Address,
        function_name: impl Into<String>,
        amount: u64,
        mode: MintMode,
    ) -> Self {
        Self {
            from,
            contract,
            function_name: function_name.into(),
            amount: U256::from(amount),
            mode,
        }
    }

    /// The active mode
    pub fn mode(&self) -> &MintMode {
        &self.mode
    }

    /// Selector plus encoded arguments
    pub fn calldata(&self) -> Bytes {
        let signature = self.mode.function_signature(&self.function_name);
        let hash = keccak256(signature.as_bytes());
        let params = DynSolValue::Tuple(self.mode.arguments(self.amount)).abi_encode_params();

        let mut input = Vec::with_capacity(4 + params.len());
        input.extend_from_slice(&hash[..4]);
        input.extend_from_slice(&params);
        input.into()
    }

    /// The call with `overrides` applied
    pub fn call(&self, overrides: &Overrides) -> MintCall {
        MintCall {
            from: self.from,
            to: self.contract,
            signature: self.mode.function_signature(&self.function_name),
            input: self.calldata(),
            value: overrides.value.as_u256(),
            gas_limit: overrides.gas_limit,
            fee: overrides.fee,
        }
    }

    /// Estimate or submit the call.
    pub async fn execute(
        &self,
        client: &dyn ChainClient,
        overrides: &Overrides,
        intent: CallIntent,
    ) -> Result<CallOutcome, ChainError> {
        match intent {
            CallIntent::Estimate => self.estimate(client, overrides).await.map(CallOutcome::GasEstimate),
            CallIntent::Submit => self.submit(client, overrides).await.map(CallOutcome::Pending),
        }
    }

    /// Gas estimate for the call.
    ///
    /// Any gas limit is dropped so an undersized override cannot cap the
    /// estimate; everything else is identical to [`MintCallBuilder::submit`].
    pub async fn estimate(
        &self,
        client: &dyn ChainClient,
        overrides: &Overrides,
    ) -> Result<u64, ChainError> {
        let mut call = self.call(overrides);
        call.gas_limit = None;
        client.estimate_gas(&call).await
    }

    /// Sign and broadcast the call
    pub async fn submit(
        &self,
        client: &dyn ChainClient,
        overrides: &Overrides,
    ) -> Result<TxHash, ChainError> {
        client.send_transaction(&self.call(overrides)).await
    }
}
