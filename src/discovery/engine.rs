// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Discovery: fetch, scan, probe, score, rank

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy_primitives::Address;
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use super::denylist::Denylist;
use super::extract::{scan_page, MarketplaceHint};
use super::fetch::PageFetcher;
use crate::config::constants::discovery::HINT_BONUS;
use crate::probe::{CapabilityProber, TokenStandard};
use crate::spans;

/// A probed address that qualified as a collectible contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Contract address
    pub address: Address,
    /// Textual occurrences on the page
    pub frequency: u32,
    /// Whether a marketplace hint named it
    pub hinted: bool,
    /// Identified standard
    pub standard: TokenStandard,
    /// `frequency` plus the hint bonus when hinted
    pub score: u32,
}

/// Ranked discovery result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Qualified candidates, best first
    pub candidates: Vec<Candidate>,
    /// Highest-scoring candidate
    pub top: Option<Address>,
    /// Hinted addresses per marketplace
    pub hints: BTreeMap<String, Vec<Address>>,
    /// Why the page could not be scanned, if it could not
    pub fetch_error: Option<String>,
}

/// Composite score of a candidate
pub fn score(frequency: u32, hinted: bool, hint_bonus: u32) -> u32 {
    if hinted {
        frequency.saturating_add(hint_bonus)
    } else {
        frequency
    }
}

/// Identifies the collectible contract a page is about
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use mintrelay::discovery::{DiscoveryEngine, HttpPageFetcher};
/// use mintrelay::probe::CapabilityProber;
///
/// let engine = DiscoveryEngine::new(
///     Arc::new(HttpPageFetcher::new()?),
///     CapabilityProber::new(chain_client),
/// );
/// let report = engine.discover("https://opensea.io/collection/example").await;
/// if let Some(top) = report.top {
///     println!("mint target: {top}");
/// }
/// ```
#[derive(Clone)]
pub struct DiscoveryEngine {
    fetcher: Arc<dyn PageFetcher>,
    prober: CapabilityProber,
    denylist: Denylist,
    marketplaces: Vec<MarketplaceHint>,
    hint_bonus: u32,
}

impl DiscoveryEngine {
    /// Engine with the built-in denylist and marketplaces
    pub fn new(fetcher: Arc<dyn PageFetcher>, prober: CapabilityProber) -> Self {
        Self {
            fetcher,
            prober,
            denylist: Denylist::default(),
            marketplaces: MarketplaceHint::defaults(),
            hint_bonus: HINT_BONUS,
        }
    }

    /// Replace the denylist
    #[must_use]
    pub fn with_denylist(mut self, denylist: Denylist) -> Self {
        self.denylist = denylist;
        self
    }

    /// Replace the marketplace hint patterns
    #[must_use]
    pub fn with_marketplaces(mut self, marketplaces: Vec<MarketplaceHint>) -> Self {
        self.marketplaces = marketplaces;
        self
    }

    /// The active denylist
    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Discover candidates on `page_url`.
    ///
    /// Never fails: fetch problems yield an empty report with `fetch_error` set.
    pub async fn discover(&self, page_url: &str) -> DiscoveryReport {
        async {
            let body = match self.fetcher.fetch(page_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Page fetch failed");
                    return DiscoveryReport {
                        fetch_error: Some(e.to_string()),
                        ..Default::default()
                    };
                }
            };

            let scan = scan_page(page_url, &body, &self.marketplaces, &self.denylist);
            debug!(
                candidates = scan.candidates.len(),
                hinted_marketplaces = scan.hints.len(),
                "Page scanned"
            );

            let mut candidates = Vec::new();
            for scanned in &scan.candidates {
                let result = self.prober.probe(scanned.address).await;
                let Some(standard) = result.standard.filter(|_| result.is_contract_of_interest)
                else {
                    debug!(address = %scanned.address, "Not a collectible contract");
                    continue;
                };
                candidates.push(Candidate {
                    address: scanned.address,
                    frequency: scanned.frequency,
                    hinted: scanned.hinted,
                    standard,
                    score: score(scanned.frequency, scanned.hinted, self.hint_bonus),
                });
            }

            // stable: equal scores keep candidate order
            candidates.sort_by(|a, b| b.score.cmp(&a.score));
            let top = candidates.first().map(|candidate| candidate.address);

            info!(qualified = candidates.len(), top = ?top, "Discovery finished");

            DiscoveryReport {
                candidates,
                top,
                hints: scan.hints,
                fetch_error: None,
            }
        }
        .instrument(spans::discover(page_url))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_adds_bonus_only_when_hinted() {
        assert_eq!(score(5, false, HINT_BONUS), 5);
        assert_eq!(score(2, true, HINT_BONUS), 5);
        assert_eq!(score(0, true, HINT_BONUS), 3);
        assert_eq!(score(u32::MAX, true, HINT_BONUS), u32::MAX);
    }
}
