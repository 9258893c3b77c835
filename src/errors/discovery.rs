// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors from fetching the page that contract discovery scans.
//!
//! The discovery engine turns all of these into an empty report; they are
//! surfaced for logging and for the `fetch_error` field, never as a crash.

/// Errors that can occur while fetching a collection or launchpad page.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The HTTP request failed (connection, timeout, TLS).
    #[error("Failed to fetch {url}")]
    Fetch {
        /// The page URL
        url: String,
        /// The underlying HTTP client error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus {
        /// The page URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The page body was empty.
    #[error("Page {url} is empty")]
    EmptyPage {
        /// The page URL
        url: String,
    },
}

impl DiscoveryError {
    /// Helper to create a `Fetch` error from any error type.
    pub fn fetch(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        DiscoveryError::Fetch {
            url: url.into(),
            source: Box::new(source),
        }
    }
}
