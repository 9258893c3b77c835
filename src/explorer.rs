// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block explorer links for confirmed transactions

use alloy_chains::NamedChain;
use alloy_primitives::TxHash;

/// Host key to transaction URL prefix. Order matters: the first key found in
/// the RPC string wins, so more specific keys come first.
const EXPLORERS: &[(&str, &str)] = &[
    ("base-sepolia", "https://sepolia.basescan.org/tx/"),
    ("sepolia", "https://sepolia.etherscan.io/tx/"),
    ("base", "https://basescan.org/tx/"),
    ("polygon", "https://polygonscan.com/tx/"),
    ("bsc", "https://bscscan.com/tx/"),
    ("monad", "https://explorer.monad.xyz/tx/"),
    // generic; checked last
    ("mainnet", "https://etherscan.io/tx/"),
];

/// Best-effort explorer link for `tx_hash`.
///
/// Matches the RPC string against known network names, then falls back to
/// the chain's registered explorer when a chain id is known. `None` when
/// nothing matches.
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::TxHash;
/// use mintrelay::explorer::tx_explorer_link;
///
/// let link = tx_explorer_link("https://base-sepolia.g.alchemy.com/v2/key", None, TxHash::ZERO);
/// assert!(link.unwrap().starts_with("https://sepolia.basescan.org/tx/0x"));
/// assert_eq!(tx_explorer_link("http://localhost:8545", None, TxHash::ZERO), None);
/// ```
pub fn tx_explorer_link(rpc: &str, chain_id: Option<u64>, tx_hash: TxHash) -> Option<String> {
    let rpc = rpc.to_lowercase();
    if let Some((_, prefix)) = EXPLORERS.iter().find(|(key, _)| rpc.contains(key)) {
        return Some(format!("{prefix}{tx_hash}"));
    }

    let chain = NamedChain::try_from(chain_id?).ok()?;
    let (_, base) = chain.etherscan_urls()?;
    Some(format!("{}/tx/{tx_hash}", base.trim_end_matches('/')))
}
