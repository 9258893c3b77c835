// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Address extraction from page text
//!
//! Pure text processing, no network: raw address frequencies, marketplace
//! JSON hints, and the ordered candidate list that discovery probes.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use alloy_primitives::Address;
use regex::Regex;

use super::denylist::Denylist;

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x[a-fA-F0-9]{40}").expect("address pattern is valid"));

static JSON_ADDRESS_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([A-Za-z_][A-Za-z0-9_]*)"\s*:\s*"(0x[a-fA-F0-9]{40})""#)
        .expect("json field pattern is valid")
});

/// A marketplace whose pages embed the collection address under a known JSON key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceHint {
    name: String,
    url_marker: String,
    json_key: String,
}

impl MarketplaceHint {
    /// Hint applying to URLs containing `url_marker` (case-insensitive)
    pub fn new(
        name: impl Into<String>,
        url_marker: impl Into<String>,
        json_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url_marker: url_marker.into().to_lowercase(),
            json_key: json_key.into(),
        }
    }

    /// OpenSea: `"address": "0x…"`
    pub fn opensea() -> Self {
        Self::new("opensea", "opensea", "address")
    }

    /// Magic Eden: `"contractAddress": "0x…"`
    pub fn magiceden() -> Self {
        Self::new("magiceden", "magiceden", "contractAddress")
    }

    /// Built-in marketplaces
    pub fn defaults() -> Vec<Self> {
        vec![Self::opensea(), Self::magiceden()]
    }

    /// Marketplace name used as the report key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this marketplace's pattern applies to `page_url`
    pub fn applies_to(&self, page_url: &str) -> bool {
        page_url.to_lowercase().contains(&self.url_marker)
    }

    /// Unique addresses under this marketplace's JSON key, in page order
    pub fn extract(&self, body: &str) -> Vec<Address> {
        let mut seen = HashSet::new();
        JSON_ADDRESS_FIELD
            .captures_iter(body)
            .filter(|captures| &captures[1] == self.json_key)
            .filter_map(|captures| captures[2].parse::<Address>().ok())
            .filter(|address| seen.insert(*address))
            .collect()
    }
}

/// Unique addresses with occurrence counts.
///
/// Ordered by count descending, ties by first appearance.
pub fn address_frequencies(body: &str) -> Vec<(Address, u32)> {
    let mut positions: HashMap<Address, usize> = HashMap::new();
    let mut counts: Vec<(Address, u32)> = Vec::new();

    for address in ADDRESS
        .find_iter(body)
        .filter_map(|found| found.as_str().parse::<Address>().ok())
    {
        match positions.get(&address) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(address, counts.len());
                counts.push((address, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// One address scheduled for probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedAddress {
    /// The address
    pub address: Address,
    /// Textual occurrences on the page
    pub frequency: u32,
    /// Whether a marketplace hint named it
    pub hinted: bool,
}

/// Result of scanning one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    /// Denylist-filtered candidates: frequency-ranked raw addresses, then hint-only ones
    pub candidates: Vec<ScannedAddress>,
    /// Hinted addresses per marketplace, before denylist filtering
    pub hints: BTreeMap<String, Vec<Address>>,
}

/// Scan `body` fetched from `page_url` into an ordered candidate list.
pub fn scan_page(
    page_url: &str,
    body: &str,
    marketplaces: &[MarketplaceHint],
    denylist: &Denylist,
) -> PageScan {
    let frequencies = address_frequencies(body);

    let mut hints = BTreeMap::new();
    let mut hinted: Vec<Address> = Vec::new();
    for marketplace in marketplaces.iter().filter(|m| m.applies_to(page_url)) {
        let found = marketplace.extract(body);
        if !found.is_empty() {
            hinted.extend(found.iter().copied());
            hints.insert(marketplace.name().to_string(), found);
        }
    }
    let hinted_set: HashSet<Address> = hinted.iter().copied().collect();
    let frequency_of: HashMap<Address, u32> = frequencies.iter().copied().collect();

    let mut seen = HashSet::new();
    let candidates = frequencies
        .iter()
        .map(|(address, _)| *address)
        .chain(hinted)
        .filter(|address| seen.insert(*address))
        .filter(|address| !denylist.contains(address))
        .map(|address| ScannedAddress {
            address,
            frequency: frequency_of.get(&address).copied().unwrap_or(0),
            hinted: hinted_set.contains(&address),
        })
        .collect();

    PageScan { candidates, hints }
}
