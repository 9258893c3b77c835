// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer for the endpoint pool.
//!
//! Each configured endpoint becomes a reqwest HTTP transport wrapped in a
//! [`LoggingLayer`]. The wrapped transports are handed to a
//! [`FailoverService`], which is the transport behind every alloy provider the
//! crate builds.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alloy_rpc_client::RpcClient;
//! use alloy_transport::BoxTransport;
//! use mintrelay::transport::{FailoverMember, FailoverService, LoggingLayer};
//! use tower::Layer;
//!
//! let members = urls
//!     .iter()
//!     .enumerate()
//!     .map(|(i, url)| {
//!         let http = alloy_transport_http::Http::new(url.clone());
//!         let logged = LoggingLayer::new(url.as_str()).layer(http);
//!         FailoverMember::new(url.as_str(), stall, BoxTransport::new(logged))
//!     })
//!     .collect();
//! let client = RpcClient::new(FailoverService::new(members).unwrap(), false);
//! ```

mod failover;
mod logging;

pub use failover::{FailoverMember, FailoverService};
pub use logging::{LoggingLayer, LoggingService};
