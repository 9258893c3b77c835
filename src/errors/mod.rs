// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the mintrelay library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`ConfigError`],
//!   [`ChainError`], [`MintError`], [`DiscoveryError`])
//! - **Unified error type** ([`MintrelayError`]) for callers that do not need
//!   to distinguish between error sources
//!
//! # Taxonomy
//!
//! - [`ConfigError`] - invalid or missing settings. Fatal for the affected
//!   operation, raised before any network call, never retried.
//! - [`ChainError`] - endpoint unreachable, timed out, malformed response, or a
//!   revert-class rejection. The endpoint pool retries transport failures
//!   across endpoints; the orchestrator retries across time.
//! - [`MintError::InsufficientFunds`] - detected at preflight, terminal for the
//!   identity.
//! - [`DiscoveryError`] - page fetch failures. Discovery degrades to an empty
//!   result instead of propagating them.
//!
//! # Example
//!
//! ```rust,ignore
//! use mintrelay::{MintError, MintOrchestrator};
//!
//! match orchestrator.preflight().await {
//!     Ok(report) if report.feasible => { /* submit */ }
//!     Ok(report) => eprintln!("need {} have {}", report.required_total, report.balance),
//!     Err(MintError::Chain(e)) if e.is_revert() => eprintln!("rejected: {e}"),
//!     Err(e) => eprintln!("preflight failed: {e}"),
//! }
//! ```

mod chain;
mod config;
mod discovery;
mod mint;

pub use chain::{ChainError, ChainErrorClass};
pub use config::ConfigError;
pub use discovery::DiscoveryError;
pub use mint::MintError;

/// Unified error type for all mintrelay operations.
///
/// All module-specific error types convert into `MintrelayError` via `From`,
/// so `?` works across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum MintrelayError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chain access error.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Mint submission error.
    #[error("Mint error: {0}")]
    Mint(#[from] MintError),

    /// Discovery page fetch error.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}
