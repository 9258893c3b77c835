// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for mintrelay integration tests
//!
//! Provides scripted implementations of the chain, page and transport seams
//! so the orchestrator, discovery engine and endpoint pool can be tested
//! without real endpoints.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use alloy_dyn_abi::DynSolValue;
use alloy_json_rpc::{ErrorPayload, RequestPacket, Response, ResponsePacket, ResponsePayload};
use alloy_primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use alloy_transport::{BoxTransport, TransportError, TransportErrorKind, TransportFut};
use async_trait::async_trait;
use mintrelay::chain::{ChainClient, FeeData};
use mintrelay::discovery::PageFetcher;
use mintrelay::mint::MintCall;
use mintrelay::{ChainError, DiscoveryError};
use serde_json::value::RawValue;

/// One recorded call against [`MockChain`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    Balance(Address),
    FeeData,
    Call { to: Address, input: Bytes },
    EstimateGas(MintCall),
    SendTransaction(MintCall),
    WaitForReceipt(TxHash),
}

/// How a mock contract answers probe calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockContract {
    /// `supportsInterface(0x80ac58cd)` is true
    Erc721,
    /// `supportsInterface(0xd9b67a26)` is true
    Erc1155,
    /// No ERC-165, but `name()` and `symbol()` answer
    NamedOnly,
    /// `supportsInterface` answers false for everything, no name
    Fungible,
}

/// Scripted [`ChainClient`] that records every call
///
/// Unscripted sends return sequential hashes and unscripted receipts succeed.
///
/// # Example
///
/// ```rust,ignore
/// let chain = Arc::new(
///     MockChain::new()
///         .with_balance(ether("1"))
///         .with_estimate(80_000)
///         .with_send_results(vec![Err("execution reverted: Sold out")]),
/// );
/// ```
pub struct MockChain {
    balance: U256,
    fee_data: FeeData,
    estimate: Result<u64, String>,
    sends: Mutex<VecDeque<Result<TxHash, String>>>,
    receipts: Mutex<VecDeque<Result<bool, String>>>,
    contracts: HashMap<Address, MockContract>,
    calls: Mutex<Vec<ChainCall>>,
    sent: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    /// Zero balance, no fee data, estimates of 80000 gas
    pub fn new() -> Self {
        Self {
            balance: U256::ZERO,
            fee_data: FeeData::default(),
            estimate: Ok(80_000),
            sends: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(VecDeque::new()),
            contracts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            sent: AtomicUsize::new(0),
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_fee_data(mut self, fee_data: FeeData) -> Self {
        self.fee_data = fee_data;
        self
    }

    pub fn with_estimate(mut self, gas: u64) -> Self {
        self.estimate = Ok(gas);
        self
    }

    pub fn with_failing_estimate(mut self, message: &str) -> Self {
        self.estimate = Err(message.to_string());
        self
    }

    /// Results of the next sends, in order
    pub fn with_send_results(self, results: Vec<Result<TxHash, &str>>) -> Self {
        *self.sends.lock().unwrap() = results
            .into_iter()
            .map(|result| result.map_err(str::to_string))
            .collect();
        self
    }

    /// Receipt statuses of the next waits, in order
    pub fn with_receipts(self, receipts: Vec<Result<bool, &str>>) -> Self {
        *self.receipts.lock().unwrap() = receipts
            .into_iter()
            .map(|result| result.map_err(str::to_string))
            .collect();
        self
    }

    pub fn with_contract(mut self, address: Address, contract: MockContract) -> Self {
        self.contracts.insert(address, contract);
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Transactions submitted so far
    pub fn submissions(&self) -> Vec<MintCall> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChainCall::SendTransaction(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Gas estimates requested so far
    pub fn estimates(&self) -> Vec<MintCall> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChainCall::EstimateGas(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Addresses that received an `eth_call`
    pub fn probed_addresses(&self) -> Vec<Address> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChainCall::Call { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ChainCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn answer(&self, to: Address, input: &Bytes) -> Result<Bytes, ChainError> {
        let reverted = || ChainError::from_message("eth_call", "execution reverted");
        let contract = *self.contracts.get(&to).ok_or_else(reverted)?;
        let selector = &input[..4.min(input.len())];

        if selector == &selector_of("supportsInterface(bytes4)")[..] {
            let interface_id = input.get(4..8).ok_or_else(reverted)?;
            let supported = match contract {
                MockContract::Erc721 => interface_id == [0x80, 0xac, 0x58, 0xcd],
                MockContract::Erc1155 => interface_id == [0xd9, 0xb6, 0x7a, 0x26],
                MockContract::Fungible => false,
                MockContract::NamedOnly => return Err(reverted()),
            };
            return Ok(encode(DynSolValue::Bool(supported)));
        }

        let named = matches!(
            contract,
            MockContract::Erc721 | MockContract::Erc1155 | MockContract::NamedOnly
        );
        if named && selector == &selector_of("name()")[..] {
            return Ok(encode(DynSolValue::String("Collection".to_string())));
        }
        if named && selector == &selector_of("symbol()")[..] {
            return Ok(encode(DynSolValue::String("COL".to_string())));
        }
        Err(reverted())
    }
}

fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn encode(value: DynSolValue) -> Bytes {
    DynSolValue::Tuple(vec![value]).abi_encode_params().into()
}

#[async_trait]
impl ChainClient for MockChain {
    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.record(ChainCall::Balance(address));
        Ok(self.balance)
    }

    async fn fee_data(&self) -> Result<FeeData, ChainError> {
        self.record(ChainCall::FeeData);
        Ok(self.fee_data)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        self.record(ChainCall::Call {
            to,
            input: input.clone(),
        });
        self.answer(to, &input)
    }

    async fn estimate_gas(&self, call: &MintCall) -> Result<u64, ChainError> {
        self.record(ChainCall::EstimateGas(call.clone()));
        self.estimate
            .clone()
            .map_err(|message| ChainError::from_message("eth_estimateGas", message))
    }

    async fn send_transaction(&self, call: &MintCall) -> Result<TxHash, ChainError> {
        self.record(ChainCall::SendTransaction(call.clone()));
        let sequence = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        match self.sends.lock().unwrap().pop_front() {
            Some(result) => result
                .map_err(|message| ChainError::from_message("eth_sendRawTransaction", message)),
            None => Ok(B256::with_last_byte(sequence as u8)),
        }
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<bool, ChainError> {
        self.record(ChainCall::WaitForReceipt(tx_hash));
        match self.receipts.lock().unwrap().pop_front() {
            Some(result) => {
                result.map_err(|message| ChainError::from_message("eth_getTransactionReceipt", message))
            }
            None => Ok(true),
        }
    }
}

/// [`PageFetcher`] returning a fixed body, or failing
pub struct StaticPage {
    body: Option<String>,
    fetches: AtomicUsize,
}

impl StaticPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Every fetch answers HTTP 503
    pub fn unavailable() -> Self {
        Self {
            body: None,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StaticPage {
    async fn fetch(&self, url: &str) -> Result<String, DiscoveryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) if body.trim().is_empty() => Err(DiscoveryError::EmptyPage {
                url: url.to_string(),
            }),
            Some(body) => Ok(body.clone()),
            None => Err(DiscoveryError::HttpStatus {
                url: url.to_string(),
                status: 503,
            }),
        }
    }
}

/// What a [`ScriptedTransport`] answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON-RPC success with this raw JSON result
    Result(String),
    /// JSON-RPC error payload
    RpcError { code: i64, message: &'static str },
    /// Transport-level failure
    Unreachable,
}

impl Reply {
    /// Success carrying `json` as the raw result
    pub fn result(json: impl Into<String>) -> Self {
        Reply::Result(json.into())
    }
}

/// A tower service standing in for one RPC endpoint
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    delay: Duration,
    reply: Reply,
    by_method: HashMap<String, Reply>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Answer every request with `reply`
    pub fn new(reply: Reply) -> Self {
        Self {
            delay: Duration::ZERO,
            reply,
            by_method: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `method` with `reply` instead of the default
    pub fn answering(mut self, method: &str, reply: Reply) -> Self {
        self.by_method.insert(method.to_string(), reply);
        self
    }

    /// Answer only after `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared call counter, readable after the transport is boxed
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn boxed(self) -> BoxTransport {
        BoxTransport::new(self)
    }
}

impl tower::Service<RequestPacket> for ScriptedTransport {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let reply = match &request {
            RequestPacket::Single(single) => self.by_method.get(single.method()),
            RequestPacket::Batch(_) => None,
        }
        .unwrap_or(&self.reply)
        .clone();
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let id = match &request {
                RequestPacket::Single(single) => single.id().clone(),
                RequestPacket::Batch(_) => {
                    return Err(TransportErrorKind::custom_str("batch not scripted"));
                }
            };
            let payload = match reply {
                Reply::Result(json) => ResponsePayload::Success(
                    RawValue::from_string(json)
                        .map_err(|e| TransportErrorKind::custom_str(&e.to_string()))?,
                ),
                Reply::RpcError { code, message } => ResponsePayload::Failure(ErrorPayload {
                    code,
                    message: message.into(),
                    data: None,
                }),
                Reply::Unreachable => {
                    return Err(TransportErrorKind::custom_str("connection refused"));
                }
            };
            Ok(ResponsePacket::Single(Response { id, payload }))
        })
    }
}

/// Parse an ether amount into wei
pub fn ether(amount: &str) -> U256 {
    alloy_primitives::utils::parse_ether(amount).unwrap()
}
