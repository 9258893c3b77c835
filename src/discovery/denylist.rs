// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Addresses excluded from discovery before any probing

use std::collections::HashSet;

use alloy_primitives::Address;

use crate::config::constants::denylist::DEFAULT;

/// Set of addresses that are never candidates.
///
/// [`Denylist::default`] holds the built-in infrastructure list (stablecoins,
/// wrapped native tokens, marketplace routers, the zero address).
///
/// # Examples
///
/// ```rust
/// use alloy_primitives::{address, Address};
/// use mintrelay::discovery::Denylist;
///
/// let extra = address!("1234567890123456789012345678901234567890");
/// let denylist = Denylist::default().with(extra);
///
/// assert!(denylist.contains(&Address::ZERO));
/// assert!(denylist.contains(&extra));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist(HashSet<Address>);

impl Default for Denylist {
    fn default() -> Self {
        DEFAULT.into_iter().collect()
    }
}

impl Denylist {
    /// A denylist that excludes nothing
    pub fn empty() -> Self {
        Self(HashSet::new())
    }

    /// Add one address
    #[must_use]
    pub fn with(mut self, address: Address) -> Self {
        self.0.insert(address);
        self
    }

    /// Whether `address` is excluded
    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    /// Number of excluded addresses
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is excluded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over excluded addresses, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

impl Extend<Address> for Denylist {
    fn extend<T: IntoIterator<Item = Address>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<Address> for Denylist {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
