// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known addresses and constants
//!
//! This module centralizes magic constants and well-known blockchain addresses
//! used throughout the mintrelay crate.

use std::time::Duration;

use alloy_primitives::{address, Address, FixedBytes};

/// Timing defaults for endpoints, discovery and the retry loop
pub mod timing {
    use super::*;

    /// How long an endpoint may stay silent before the next one is tried
    pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_millis(2000);

    /// HTTP request timeout for each RPC endpoint
    pub const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

    /// HTTP request timeout for discovery page fetches
    pub const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

    /// Delay between mint attempts for one identity
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(3000);

    /// Pause between identities in a multi-key run
    pub const INTER_IDENTITY_PAUSE: Duration = Duration::from_millis(800);

    /// Longest wait for a broadcast transaction's receipt
    pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
}

/// Gas and fee defaults used by preflight
pub mod gas {
    /// Gas limit used when estimation fails and no override is configured
    pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

    /// Fee per gas used when the network reports neither EIP-1559 nor legacy fees (5 gwei)
    pub const FEE_FLOOR_WEI: u128 = 5_000_000_000;

    /// Priority fee used when the network does not suggest one (1.5 gwei)
    pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_500_000_000;

    /// Estimate headroom as a percentage of the raw estimate
    pub const GAS_HEADROOM_PERCENT: u64 = 120;
}

/// Contract discovery constants
pub mod discovery {
    use super::*;

    /// Score added to candidates that appear in a structured marketplace hint
    pub const HINT_BONUS: u32 = 3;

    /// Browser-like identification sent with page fetches
    pub const USER_AGENT: &str = "Mozilla/5.0";

    /// ERC-165 interface id of ERC-721
    pub const ERC721_INTERFACE_ID: FixedBytes<4> = FixedBytes([0x80, 0xac, 0x58, 0xcd]);

    /// ERC-165 interface id of ERC-1155
    pub const ERC1155_INTERFACE_ID: FixedBytes<4> = FixedBytes([0xd9, 0xb6, 0x7a, 0x26]);
}

/// Infrastructure addresses that are never collectible contracts
pub mod denylist {
    use super::*;

    /// OpenSea Seaport router
    pub const OPENSEA_SEAPORT: Address = address!("00005ea00ac477b1030ce78506496e8c2de24bf5");

    /// OpenSea conduit
    pub const OPENSEA_CONDUIT: Address = address!("0000a26b00c1f0df003000390027140000faa719");

    /// USDC on Ethereum Mainnet
    pub const ETH_USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    /// DAI on Ethereum Mainnet
    pub const ETH_DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");

    /// WETH on Ethereum Mainnet
    pub const ETH_WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

    /// WETH on Polygon
    pub const POLYGON_WETH: Address = address!("7ceb23fd6bc0add59e62ac25578270cff1b9f619");

    /// WMATIC on Polygon
    pub const POLYGON_WMATIC: Address = address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270");

    /// Native USDC on Base
    pub const BASE_USDC: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");

    /// WETH predeploy on Base and other OP Stack chains
    pub const OP_STACK_WETH: Address = address!("4200000000000000000000000000000000000006");

    /// Blast predeploy
    pub const BLAST_PREDEPLOY_3: Address = address!("4300000000000000000000000000000000000003");

    /// Blast predeploy
    pub const BLAST_PREDEPLOY_4: Address = address!("4300000000000000000000000000000000000004");

    /// Placeholder address seen in launchpad page templates
    pub const PLACEHOLDER_6969: Address = address!("6969696969696969696969696969696969696969");

    /// The built-in denylist, zero address included
    pub const DEFAULT: [Address; 13] = [
        OPENSEA_SEAPORT,
        OPENSEA_CONDUIT,
        ETH_USDC,
        ETH_DAI,
        ETH_WETH,
        POLYGON_WETH,
        POLYGON_WMATIC,
        BASE_USDC,
        OP_STACK_WETH,
        BLAST_PREDEPLOY_3,
        BLAST_PREDEPLOY_4,
        Address::ZERO,
        PLACEHOLDER_6969,
    ];
}
