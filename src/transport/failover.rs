// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Ordered failover across several RPC endpoints.
//!
//! [`FailoverService`] is a tower service over [`RequestPacket`]s that fronts
//! a priority-ordered list of endpoint transports:
//!
//! - Endpoint 0 is called first.
//! - When the most recently launched endpoint stays silent for its stall
//!   window, or any in-flight endpoint fails, the next endpoint is launched.
//!   Earlier calls stay in flight.
//! - The first acceptable response wins and every other outcome is dropped.
//! - A JSON-RPC error payload the server flags as retryable (rate limits,
//!   overload) counts as an endpoint failure. Any other JSON-RPC error, such
//!   as an execution revert, is the network's answer and is accepted.
//! - When all endpoints fail, the last rejected response is returned if there
//!   is one, otherwise the last transport error.
//!
//! With a single endpoint the service is a passthrough without timers.

use std::{
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket, ResponsePayload};
use alloy_transport::{BoxTransport, TransportError, TransportErrorKind, TransportFut};
use futures::stream::{FuturesUnordered, StreamExt};
use tower::Service;
use tracing::{debug, warn};

/// One endpoint as seen by the failover service.
#[derive(Clone, Debug)]
pub struct FailoverMember {
    label: Arc<str>,
    stall_timeout: Duration,
    transport: BoxTransport,
}

impl FailoverMember {
    /// Create a member from a label used in logs, its stall window and its transport.
    pub fn new(label: impl Into<Arc<str>>, stall_timeout: Duration, transport: BoxTransport) -> Self {
        Self {
            label: label.into(),
            stall_timeout,
            transport,
        }
    }

    /// Label used in log records
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A tower service racing priority-ordered endpoints with quorum 1.
///
/// # Example
///
/// ```rust,ignore
/// use alloy_rpc_client::RpcClient;
/// use mintrelay::transport::{FailoverMember, FailoverService};
///
/// let service = FailoverService::new(vec![
///     FailoverMember::new("rpc-0", stall, BoxTransport::new(primary)),
///     FailoverMember::new("rpc-1", stall, BoxTransport::new(backup)),
/// ])?;
/// let client = RpcClient::new(service, false);
/// ```
#[derive(Clone, Debug)]
pub struct FailoverService {
    members: Arc<[FailoverMember]>,
}

impl FailoverService {
    /// Create a service over `members`, in priority order.
    ///
    /// Returns `None` when `members` is empty.
    pub fn new(members: Vec<FailoverMember>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        Some(Self {
            members: members.into(),
        })
    }

    /// Number of endpoints behind this service
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a service is never built without members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Service<RequestPacket> for FailoverService {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let members = Arc::clone(&self.members);
        Box::pin(dispatch(members, request))
    }
}

async fn dispatch(
    members: Arc<[FailoverMember]>,
    request: RequestPacket,
) -> Result<ResponsePacket, TransportError> {
    if let [only] = &*members {
        let mut transport = only.transport.clone();
        return transport.call(request).await;
    }

    let launch = |index: usize| {
        let member = &members[index];
        let mut transport = member.transport.clone();
        let request = request.clone();
        debug!(endpoint = %member.label, priority = index, "Launching endpoint");
        async move { (index, transport.call(request).await) }
    };

    let mut in_flight = FuturesUnordered::new();
    in_flight.push(launch(0));
    let mut next = 1;

    let mut last_rejected: Option<ResponsePacket> = None;
    let mut last_error: Option<TransportError> = None;

    loop {
        let settled = if next < members.len() {
            let stall = members[next - 1].stall_timeout;
            tokio::select! {
                settled = in_flight.next() => settled,
                _ = tokio::time::sleep(stall) => {
                    warn!(
                        endpoint = %members[next - 1].label,
                        stall_ms = stall.as_millis() as u64,
                        "Endpoint stalled, trying next"
                    );
                    in_flight.push(launch(next));
                    next += 1;
                    continue;
                }
            }
        } else {
            in_flight.next().await
        };

        let Some((index, result)) = settled else {
            break;
        };

        match result {
            Ok(response) if is_acceptable(&response) => {
                debug!(endpoint = %members[index].label, "Endpoint answered");
                return Ok(response);
            }
            Ok(response) => {
                warn!(endpoint = %members[index].label, "Endpoint returned a retryable error response");
                last_rejected = Some(response);
            }
            Err(error) => {
                warn!(endpoint = %members[index].label, error = %error, "Endpoint failed");
                last_error = Some(error);
            }
        }

        if next < members.len() {
            in_flight.push(launch(next));
            next += 1;
        }
    }

    match (last_rejected, last_error) {
        (Some(response), _) => Ok(response),
        (None, Some(error)) => Err(error),
        (None, None) => Err(TransportErrorKind::custom_str("all RPC endpoints failed")),
    }
}

/// Whether a response settles the call.
///
/// Retryable JSON-RPC errors (rate limits, overload) mark the endpoint as
/// failed; any other payload is the network's answer.
fn is_acceptable(response: &ResponsePacket) -> bool {
    let retryable = |payload: &ResponsePayload| match payload {
        ResponsePayload::Success(_) => false,
        ResponsePayload::Failure(error) => error.is_retry_err(),
    };
    match response {
        ResponsePacket::Single(single) => !retryable(&single.payload),
        ResponsePacket::Batch(batch) => !batch.iter().any(|single| retryable(&single.payload)),
    }
}
