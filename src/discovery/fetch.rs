// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Page fetching for discovery

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT as USER_AGENT_HEADER;
use tracing::debug;

use crate::config::constants::discovery::USER_AGENT;
use crate::config::constants::timing::PAGE_FETCH_TIMEOUT;
use crate::errors::{ConfigError, DiscoveryError};

/// Source of page bodies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` as text.
    ///
    /// Empty bodies are reported as [`DiscoveryError::EmptyPage`].
    async fn fetch(&self, url: &str) -> Result<String, DiscoveryError>;
}

/// reqwest-backed fetcher with a bounded timeout and a browser-like user agent
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Fetcher with the default 20 second timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the client cannot be built
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_timeout(PAGE_FETCH_TIMEOUT)
    }

    /// Fetcher with a custom timeout
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the client cannot be built
    pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DiscoveryError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .send()
            .await
            .map_err(|e| DiscoveryError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::fetch(url, e))?;

        if body.trim().is_empty() {
            return Err(DiscoveryError::EmptyPage {
                url: url.to_string(),
            });
        }

        debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
