// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for mintrelay operations.
//!
//! Telemetry is kept out of business logic: each instrumented operation has a
//! span helper here instead of an `#[instrument]` attribute.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     async {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(param_value))
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use tracing::{Level, Span};

use crate::mint::MintModeKind;

/// Create span for processing one signing identity.
///
/// Parent: None (root span for a mint run)
/// Children: preflight and mint_attempt spans
#[inline]
pub(crate) fn mint_identity(identity: Address, contract: Address, mode: MintModeKind) -> Span {
    tracing::span!(
        Level::INFO,
        "mintrelay.mint_identity",
        identity = %identity,
        contract = %contract,
        mode = %mode,
    )
}

/// Create span for one submit-and-wait attempt.
///
/// Parent: mint_identity span
/// Children: RPC calls for broadcast and receipt polling
#[inline]
pub(crate) fn mint_attempt(attempt: u32) -> Span {
    tracing::debug_span!("mintrelay.mint_attempt", attempt = attempt)
}

/// Create span for preflight validation.
///
/// Parent: mint_identity span
/// Children: balance, fee and estimate RPC calls
#[inline]
pub(crate) fn preflight(identity: Address) -> Span {
    tracing::debug_span!("mintrelay.preflight", identity = %identity)
}

/// Create span for a discovery run.
///
/// Parent: None (root span for this operation)
/// Children: probe_candidate spans (one per surviving candidate)
#[inline]
pub(crate) fn discover(page_url: &str) -> Span {
    tracing::span!(Level::INFO, "mintrelay.discover", page_url = %page_url)
}

/// Create span for probing one candidate address.
///
/// Parent: discover span
/// Children: eth_call RPCs for each capability check
#[inline]
pub(crate) fn probe_candidate(address: Address) -> Span {
    tracing::debug_span!("mintrelay.probe_candidate", address = %address)
}
