// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower-based logging layer for a single RPC endpoint.
//!
//! Every endpoint in the failover pool is wrapped in a [`LoggingService`], so
//! each RPC records which endpoint served it, the method and the duration.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Span};

/// A Tower layer that adds logging/tracing to RPC requests sent to one endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use mintrelay::transport::LoggingLayer;
/// use tower::Layer;
///
/// let http = alloy_transport_http::Http::new(url);
/// let logged = LoggingLayer::new("rpc-0").layer(http);
/// ```
#[derive(Clone, Debug)]
pub struct LoggingLayer {
    endpoint: Arc<str>,
    /// Whether to log request and response payloads (can be verbose)
    log_payloads: bool,
}

impl LoggingLayer {
    /// Creates a logging layer that tags every record with `endpoint`.
    ///
    /// By default, only timing and errors are logged.
    pub fn new(endpoint: impl Into<Arc<str>>) -> Self {
        Self {
            endpoint: endpoint.into(),
            log_payloads: false,
        }
    }

    /// Enables logging of request and response payloads at `trace` level.
    ///
    /// Warning: raw transactions end up in the log.
    pub fn verbose(mut self) -> Self {
        self.log_payloads = true;
        self
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingService<S>;

    fn layer(&self, service: S) -> Self::Service {
        LoggingService {
            service,
            endpoint: Arc::clone(&self.endpoint),
            log_payloads: self.log_payloads,
        }
    }
}

/// A Tower service that logs RPC requests and responses for one endpoint.
#[derive(Clone, Debug)]
pub struct LoggingService<S> {
    service: S,
    endpoint: Arc<str>,
    log_payloads: bool,
}

impl<S> tower::Service<RequestPacket> for LoggingService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_payloads = self.log_payloads;
        let endpoint = Arc::clone(&self.endpoint);
        let mut service = self.service.clone();

        let method = extract_method(&request);

        Box::pin(async move {
            let start = Instant::now();

            let span = tracing::info_span!(
                "rpc_call",
                endpoint = %endpoint,
                method = %method,
                duration_ms = tracing::field::Empty,
            );

            let _guard = span.enter();

            if log_payloads {
                trace!(request = ?request, "RPC request");
            } else {
                debug!("RPC request: {method}");
            }

            let result = service.call(request).await;
            let duration = start.elapsed();

            Span::current().record("duration_ms", duration.as_millis() as u64);

            match &result {
                Ok(response) if log_payloads => {
                    trace!(
                        response = ?response,
                        duration_ms = %duration.as_millis(),
                        "RPC response"
                    );
                }
                Ok(_) => {
                    debug!(
                        duration_ms = %duration.as_millis(),
                        "RPC response: {method}"
                    );
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        duration_ms = %duration.as_millis(),
                        "RPC error: {method}"
                    );
                }
            }

            result
        })
    }
}

/// Extract the RPC method name from a request packet.
pub(crate) fn extract_method(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            _ => format!("batch({} calls)", reqs.len()),
        },
    }
}
