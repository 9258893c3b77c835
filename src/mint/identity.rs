// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Signing identities and the key file

use std::fmt;
use std::path::Path;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;

use crate::errors::ConfigError;

/// A private key and the address derived from it
#[derive(Clone)]
pub struct SigningIdentity {
    signer: PrivateKeySigner,
}

impl SigningIdentity {
    /// Parse a hex private key, with or without `0x`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingPrivateKey`] for a blank key
    /// - [`ConfigError::InvalidPrivateKey`] if the key does not parse
    pub fn from_hex(key: &str) -> Result<Self, ConfigError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingPrivateKey);
        }
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { signer })
    }

    /// Derived address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The signer, for building a signing provider
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Masked form of a raw key for error reports: first six characters only
pub fn key_hint(key: &str) -> String {
    let prefix: String = key.trim().chars().take(6).collect();
    format!("{prefix}…")
}

/// Split key file contents into keys: one per line, trimmed, blanks skipped
pub fn parse_keys(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and split a newline-delimited key file
///
/// # Errors
///
/// Returns [`ConfigError::KeyFile`] if the file cannot be read
pub async fn load_key_file(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::KeyFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_keys(&contents))
}
