// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint configuration for the failover pool

use std::time::Duration;

use url::Url;

use crate::config::constants::timing::{DEFAULT_STALL_TIMEOUT, RPC_REQUEST_TIMEOUT};
use crate::errors::ConfigError;

/// One remote RPC endpoint.
///
/// Immutable once constructed; lower priority is preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    priority: usize,
    stall_timeout: Duration,
}

impl Endpoint {
    /// Create an endpoint
    #[must_use]
    pub fn new(url: Url, priority: usize, stall_timeout: Duration) -> Self {
        Self {
            url,
            priority,
            stall_timeout,
        }
    }

    /// The endpoint URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Position in the failover order, 0 first
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// How long to wait before also trying the next endpoint
    pub fn stall_timeout(&self) -> Duration {
        self.stall_timeout
    }

    /// Label for logs: host (and port) only, so API keys in paths stay out of logs
    pub fn label(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("#{} {host}:{port}", self.priority),
            (Some(host), None) => format!("#{} {host}", self.priority),
            _ => format!("#{}", self.priority),
        }
    }
}

/// Configuration for an endpoint pool
///
/// # Examples
///
/// ```rust
/// use mintrelay::provider::PoolConfig;
///
/// let config = PoolConfig::from_csv("https://rpc.ankr.com/eth, https://eth.llamarpc.com,")
///     .unwrap()
///     .with_chain_id(1);
///
/// assert_eq!(config.endpoints().len(), 2);
/// assert_eq!(config.endpoints()[1].priority(), 1);
/// assert_eq!(config.chain_id(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    endpoints: Vec<Endpoint>,
    chain_id: Option<u64>,
    request_timeout: Duration,
}

impl PoolConfig {
    /// Build a config from a comma-separated URL list.
    ///
    /// Entries are trimmed and empty entries dropped. Priority follows position.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoEndpoints`] if no URL remains
    /// - [`ConfigError::InvalidEndpointUrl`] if a URL does not parse
    pub fn from_csv(csv: &str) -> Result<Self, ConfigError> {
        Self::from_urls(csv.split(','))
    }

    /// Build a config from individual URLs, in priority order.
    ///
    /// # Errors
    ///
    /// Same as [`PoolConfig::from_csv`].
    pub fn from_urls<I, S>(urls: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = urls
            .into_iter()
            .map(|raw| raw.as_ref().trim().to_string())
            .filter(|raw| !raw.is_empty())
            .enumerate()
            .map(|(priority, raw)| {
                let url = raw
                    .parse::<Url>()
                    .map_err(|e| ConfigError::InvalidEndpointUrl {
                        url: raw.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(Endpoint::new(url, priority, DEFAULT_STALL_TIMEOUT))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        Ok(Self {
            endpoints,
            chain_id: None,
            request_timeout: RPC_REQUEST_TIMEOUT,
        })
    }

    /// Set the stall window of every endpoint
    #[must_use]
    pub fn with_stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.endpoints = self
            .endpoints
            .into_iter()
            .map(|endpoint| Endpoint::new(endpoint.url, endpoint.priority, stall_timeout))
            .collect();
        self
    }

    /// Pin the pool to a chain id
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the HTTP request timeout applied to each endpoint
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Endpoints in priority order, never empty
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// The pinned chain id, if any
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// HTTP request timeout per endpoint
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// URL of the preferred endpoint
    pub fn primary_url(&self) -> &Url {
        // `from_urls` rejects empty lists
        self.endpoints[0].url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            PoolConfig::from_csv(" , ,"),
            Err(ConfigError::NoEndpoints)
        ));
        assert!(matches!(PoolConfig::from_csv(""), Err(ConfigError::NoEndpoints)));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = PoolConfig::from_csv("https://ok.example,not a url");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEndpointUrl { ref url, .. }) if url == "not a url"
        ));
    }

    #[test]
    fn test_stall_timeout_applies_to_all() {
        let config = PoolConfig::from_csv("http://a.example,http://b.example")
            .unwrap()
            .with_stall_timeout(Duration::from_millis(50));
        assert!(config
            .endpoints()
            .iter()
            .all(|e| e.stall_timeout() == Duration::from_millis(50)));
        assert_eq!(config.endpoints()[0].stall_timeout(), Duration::from_millis(50));
    }

    #[test]
    fn test_label_hides_path() {
        let config = PoolConfig::from_csv("https://rpc.ankr.com/eth/SECRETKEY").unwrap();
        let label = config.endpoints()[0].label();
        assert_eq!(label, "#0 rpc.ankr.com");
        assert_eq!(config.primary_url().as_str(), "https://rpc.ankr.com/eth/SECRETKEY");
    }
}
