// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! On-chain capability probing for collectible contracts
//!
//! A [`CapabilityProber`] runs an ordered list of [`CapabilityCheck`]s against
//! an address. Each check yields a [`CheckVerdict`]:
//!
//! | Check | Positive when | Otherwise |
//! |---|---|---|
//! | `SupportsInterface(0x80ac58cd)` | returns `true` → ERC-721 | `false` → Negative, error → Inconclusive |
//! | `SupportsInterface(0xd9b67a26)` | returns `true` → ERC-1155 | `false` → Negative, error → Inconclusive |
//! | `NameAndSymbol` | both calls decode → Unknown standard | error → Inconclusive |
//!
//! The first positive verdict decides; later checks are not run. Call
//! failures never escape a check.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, FixedBytes};
use alloy_sol_types::{sol, SolCall};
use serde::Serialize;
use tracing::{debug, Instrument};

use crate::chain::ChainClient;
use crate::config::constants::discovery::{ERC1155_INTERFACE_ID, ERC721_INTERFACE_ID};
use crate::spans;

sol! {
    interface ICollectible {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
        function name() external view returns (string);
        function symbol() external view returns (string);
    }
}

/// Token standard a contract was identified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenStandard {
    /// ERC-721
    Erc721,
    /// ERC-1155
    Erc1155,
    /// Answers `name()` and `symbol()` but no known interface id
    Unknown,
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenStandard::Erc721 => "ERC721",
            TokenStandard::Erc1155 => "ERC1155",
            TokenStandard::Unknown => "UNKNOWN",
        })
    }
}

/// Tri-state outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckVerdict {
    /// The contract qualifies under this standard
    Positive(TokenStandard),
    /// The contract answered and does not qualify
    Negative,
    /// The check could not be completed
    Inconclusive,
}

/// One capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityCheck {
    /// ERC-165 `supportsInterface(id)`, positive under `standard`
    SupportsInterface {
        /// ERC-165 interface id
        interface_id: FixedBytes<4>,
        /// Standard reported on a positive answer
        standard: TokenStandard,
    },
    /// `name()` and `symbol()` both succeed
    NameAndSymbol,
}

impl CapabilityCheck {
    /// The default ordered check list
    pub fn default_checks() -> Vec<CapabilityCheck> {
        vec![
            CapabilityCheck::SupportsInterface {
                interface_id: ERC721_INTERFACE_ID,
                standard: TokenStandard::Erc721,
            },
            CapabilityCheck::SupportsInterface {
                interface_id: ERC1155_INTERFACE_ID,
                standard: TokenStandard::Erc1155,
            },
            CapabilityCheck::NameAndSymbol,
        ]
    }

    /// Run the check against `address`. Never fails.
    pub async fn run(&self, client: &dyn ChainClient, address: Address) -> CheckVerdict {
        match self {
            CapabilityCheck::SupportsInterface {
                interface_id,
                standard,
            } => {
                let input = ICollectible::supportsInterfaceCall {
                    interfaceId: *interface_id,
                }
                .abi_encode();
                let output = match client.call(address, input.into()).await {
                    Ok(output) => output,
                    Err(e) => {
                        debug!(%address, %interface_id, error = %e, "supportsInterface inconclusive");
                        return CheckVerdict::Inconclusive;
                    }
                };
                match ICollectible::supportsInterfaceCall::abi_decode_returns(&output) {
                    Ok(true) => CheckVerdict::Positive(*standard),
                    Ok(false) => CheckVerdict::Negative,
                    Err(e) => {
                        debug!(%address, %interface_id, error = %e, "supportsInterface undecodable");
                        CheckVerdict::Inconclusive
                    }
                }
            }
            CapabilityCheck::NameAndSymbol => {
                let name = client
                    .call(address, ICollectible::nameCall {}.abi_encode().into())
                    .await;
                let Ok(name) = name else {
                    debug!(%address, "name() inconclusive");
                    return CheckVerdict::Inconclusive;
                };
                let symbol = client
                    .call(address, ICollectible::symbolCall {}.abi_encode().into())
                    .await;
                let Ok(symbol) = symbol else {
                    debug!(%address, "symbol() inconclusive");
                    return CheckVerdict::Inconclusive;
                };

                let decoded = ICollectible::nameCall::abi_decode_returns(&name).is_ok()
                    && ICollectible::symbolCall::abi_decode_returns(&symbol).is_ok();
                if decoded {
                    CheckVerdict::Positive(TokenStandard::Unknown)
                } else {
                    CheckVerdict::Inconclusive
                }
            }
        }
    }
}

/// Final verdict for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether the address behaves as a collectible contract
    pub is_contract_of_interest: bool,
    /// The identified standard, `None` when not of interest
    pub standard: Option<TokenStandard>,
}

impl ProbeResult {
    /// Reduce verdicts, in check order, to a final result: the first positive wins.
    pub fn from_verdicts(verdicts: impl IntoIterator<Item = CheckVerdict>) -> Self {
        verdicts
            .into_iter()
            .find_map(|verdict| match verdict {
                CheckVerdict::Positive(standard) => Some(Self {
                    is_contract_of_interest: true,
                    standard: Some(standard),
                }),
                CheckVerdict::Negative | CheckVerdict::Inconclusive => None,
            })
            .unwrap_or(Self {
                is_contract_of_interest: false,
                standard: None,
            })
    }
}

/// Runs capability checks over a chain client
#[derive(Clone)]
pub struct CapabilityProber {
    client: Arc<dyn ChainClient>,
    checks: Vec<CapabilityCheck>,
}

impl CapabilityProber {
    /// Prober with the default checks
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self::with_checks(client, CapabilityCheck::default_checks())
    }

    /// Prober with a custom ordered check list
    pub fn with_checks(client: Arc<dyn ChainClient>, checks: Vec<CapabilityCheck>) -> Self {
        Self { client, checks }
    }

    /// Probe `address`, stopping at the first positive check
    pub async fn probe(&self, address: Address) -> ProbeResult {
        async {
            let mut verdicts = Vec::with_capacity(self.checks.len());
            for check in &self.checks {
                let verdict = check.run(self.client.as_ref(), address).await;
                verdicts.push(verdict);
                if matches!(verdict, CheckVerdict::Positive(_)) {
                    break;
                }
            }
            let result = ProbeResult::from_verdicts(verdicts);
            debug!(%address, ?result, "Probe finished");
            result
        }
        .instrument(spans::probe_candidate(address))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_positive_wins() {
        let result = ProbeResult::from_verdicts([
            CheckVerdict::Inconclusive,
            CheckVerdict::Positive(TokenStandard::Erc1155),
            CheckVerdict::Positive(TokenStandard::Unknown),
        ]);
        assert!(result.is_contract_of_interest);
        assert_eq!(result.standard, Some(TokenStandard::Erc1155));
    }

    #[test]
    fn test_all_negative_or_inconclusive() {
        let result = ProbeResult::from_verdicts([
            CheckVerdict::Negative,
            CheckVerdict::Inconclusive,
            CheckVerdict::Inconclusive,
        ]);
        assert!(!result.is_contract_of_interest);
        assert_eq!(result.standard, None);
    }

    #[test]
    fn test_default_check_order() {
        let checks = CapabilityCheck::default_checks();
        assert_eq!(checks.len(), 3);
        assert!(matches!(
            checks[0],
            CapabilityCheck::SupportsInterface {
                standard: TokenStandard::Erc721,
                ..
            }
        ));
        assert_eq!(checks[2], CapabilityCheck::NameAndSymbol);
    }

    #[test]
    fn test_supports_interface_calldata() {
        let input = ICollectible::supportsInterfaceCall {
            interfaceId: ERC721_INTERFACE_ID,
        }
        .abi_encode();
        // supportsInterface(bytes4) = 0x01ffc9a7
        assert_eq!(&input[..4], &[0x01, 0xff, 0xc9, 0xa7]);
        assert_eq!(&input[4..8], ERC721_INTERFACE_ID.as_slice());
    }
}
