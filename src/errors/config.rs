// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration errors.
//!
//! Every variant here is fatal for the operation it belongs to and is raised
//! before any network activity takes place. None of them are retried.

use std::path::PathBuf;

/// Invalid or missing configuration.
///
/// # Examples
///
/// ```rust
/// use mintrelay::ConfigError;
///
/// let error = ConfigError::UnknownMode("presale".to_string());
/// assert!(error.to_string().contains("presale"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The endpoint list was empty after splitting and trimming.
    #[error("No RPC endpoints configured")]
    NoEndpoints,

    /// An endpoint URL could not be parsed.
    #[error("Invalid RPC endpoint URL {url}: {reason}")]
    InvalidEndpointUrl {
        /// The URL as configured
        url: String,
        /// Why parsing failed
        reason: String,
    },

    /// The HTTP client behind the endpoints could not be built.
    #[error("Cannot build HTTP client: {0}")]
    HttpClient(String),

    /// The submission mode string is not one of the supported modes.
    #[error("Unknown mint mode: {0} (expected public, wl-merkle, wl-sig or gtd)")]
    UnknownMode(String),

    /// No signing key was supplied.
    #[error("Private key is missing")]
    MissingPrivateKey,

    /// A signing key could not be parsed.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// No contract address was supplied.
    #[error("Contract address is missing, run `detect` first")]
    MissingContract,

    /// An address could not be parsed.
    #[error("Invalid address {value}: {reason}")]
    InvalidAddress {
        /// The value as configured
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// A numeric setting could not be parsed.
    #[error("Invalid value for {field}: {value}")]
    InvalidNumber {
        /// Name of the setting
        field: &'static str,
        /// The value as configured
        value: String,
    },

    /// A merkle proof element is not a 32-byte hex value.
    #[error("Invalid merkle proof element {0}")]
    InvalidProof(String),

    /// A signature is not valid hex.
    #[error("Invalid signature hex: {0}")]
    InvalidSignature(String),

    /// The pinned chain does not match the chain the endpoints report.
    #[error("Endpoint reports chain {actual}, expected {expected}")]
    ChainMismatch {
        /// Configured chain id
        expected: u64,
        /// Chain id reported by the endpoint pool
        actual: u64,
    },

    /// The key file could not be read.
    #[error("Cannot read key file {}", path.display())]
    KeyFile {
        /// Path to the key file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create an `InvalidNumber` error.
    pub fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        ConfigError::InvalidNumber {
            field,
            value: value.into(),
        }
    }

    /// Create an `InvalidAddress` error.
    pub fn invalid_address(value: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::InvalidAddress {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
