// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Contract discovery from collection and launchpad pages
//!
//! 1. Fetch the page ([`PageFetcher`])
//! 2. Count address-shaped tokens and read marketplace JSON hints
//! 3. Drop denylisted addresses before any network call ([`Denylist`])
//! 4. Probe each survivor on-chain ([`CapabilityProber`](crate::probe::CapabilityProber))
//! 5. Score by frequency plus hint bonus and rank ([`DiscoveryEngine`])

mod denylist;
mod engine;
mod extract;
mod fetch;

pub use denylist::Denylist;
pub use engine::{score, Candidate, DiscoveryEngine, DiscoveryReport};
pub use extract::{address_frequencies, scan_page, MarketplaceHint, PageScan, ScannedAddress};
pub use fetch::{HttpPageFetcher, PageFetcher};
