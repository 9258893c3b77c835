// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the endpoint pool
//!
//! Scripted transports stand in for RPC endpoints. Time is paused, so stall
//! windows elapse instantly while keeping their ordering.

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, TxHash, U64};
use helpers::{Reply, ScriptedTransport};
use mintrelay::chain::{AlloyChainClient, ChainClient, FeeData};
use mintrelay::config::constants::gas::{DEFAULT_PRIORITY_FEE_WEI, FEE_FLOOR_WEI};
use mintrelay::mint::{GasFee, MintCallBuilder, MintMode, PreflightValidator};
use mintrelay::provider::{EndpointPool, PoolConfig};
use mintrelay::{ConfigError, MintrelayError, WeiAmount};
use proptest::prelude::*;

fn config(endpoints: usize) -> PoolConfig {
    PoolConfig::from_urls((0..endpoints).map(|i| format!("http://rpc-{i}.test")))
        .unwrap()
        .with_stall_timeout(Duration::from_millis(2000))
}

async fn chain_id(pool: &EndpointPool) -> Result<u64, String> {
    pool.client()
        .request_noparams::<U64>("eth_chainId")
        .await
        .map(|id| id.to::<u64>())
        .map_err(|e| e.to_string())
}

/// Test that configuration with zero endpoints is rejected up front
#[test]
fn test_zero_endpoints_rejected() {
    assert!(matches!(PoolConfig::from_csv(" , ,"), Err(ConfigError::NoEndpoints)));
    assert!(matches!(
        PoolConfig::from_csv("not a url"),
        Err(ConfigError::InvalidEndpointUrl { .. })
    ));
    assert!(matches!(
        EndpointPool::with_transports(config(1), vec![]),
        Err(ConfigError::NoEndpoints)
    ));
}

/// Test that endpoint 1 answers when endpoint 0 always errors
#[tokio::test(start_paused = true)]
async fn test_failing_primary_falls_through() {
    let primary = ScriptedTransport::new(Reply::Unreachable);
    let backup = ScriptedTransport::new(Reply::result(r#""0x2105""#));
    let (primary_calls, backup_calls) = (primary.counter(), backup.counter());
    let pool = EndpointPool::with_transports(config(2), vec![primary.boxed(), backup.boxed()])
        .unwrap();

    let started = tokio::time::Instant::now();
    assert_eq!(chain_id(&pool).await, Ok(8453));

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backup_calls.load(Ordering::SeqCst), 1);
    // a failure launches the next endpoint without waiting out the stall window
    assert!(started.elapsed() < Duration::from_millis(2000));
}

/// Test that a stalled primary is overtaken once its stall window passes
#[tokio::test(start_paused = true)]
async fn test_stalled_primary_overtaken() {
    let primary =
        ScriptedTransport::new(Reply::result(r#""0x1""#)).delayed(Duration::from_secs(10));
    let backup = ScriptedTransport::new(Reply::result(r#""0x2""#));
    let backup_calls = backup.counter();
    let pool = EndpointPool::with_transports(config(2), vec![primary.boxed(), backup.boxed()])
        .unwrap();

    let started = tokio::time::Instant::now();
    assert_eq!(chain_id(&pool).await, Ok(2));
    assert_eq!(backup_calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(started.elapsed() < Duration::from_secs(10));
}

/// Test that a fast failure after a stall launches the next endpoint without a second stall window
#[tokio::test(start_paused = true)]
async fn test_stall_then_failure_launches_third_immediately() {
    let primary =
        ScriptedTransport::new(Reply::result(r#""0x1""#)).delayed(Duration::from_secs(10));
    let secondary = ScriptedTransport::new(Reply::Unreachable);
    let tertiary = ScriptedTransport::new(Reply::result(r#""0x3""#));
    let (secondary_calls, tertiary_calls) = (secondary.counter(), tertiary.counter());
    let pool = EndpointPool::with_transports(
        config(3),
        vec![primary.boxed(), secondary.boxed(), tertiary.boxed()],
    )
    .unwrap();

    let started = tokio::time::Instant::now();
    assert_eq!(chain_id(&pool).await, Ok(3));

    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tertiary_calls.load(Ordering::SeqCst), 1);
    // one stall window for the primary, none for the failed secondary
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(started.elapsed() < Duration::from_millis(4000));
}

/// Test that a slow primary answering within its window is used alone
#[tokio::test(start_paused = true)]
async fn test_primary_within_window_wins() {
    let primary =
        ScriptedTransport::new(Reply::result(r#""0x1""#)).delayed(Duration::from_millis(500));
    let backup = ScriptedTransport::new(Reply::result(r#""0x2""#));
    let backup_calls = backup.counter();
    let pool = EndpointPool::with_transports(config(2), vec![primary.boxed(), backup.boxed()])
        .unwrap();

    assert_eq!(chain_id(&pool).await, Ok(1));
    assert_eq!(backup_calls.load(Ordering::SeqCst), 0);
}

/// Test that a revert answer is accepted as the network's answer
#[tokio::test(start_paused = true)]
async fn test_revert_response_accepted() {
    let primary = ScriptedTransport::new(Reply::RpcError {
        code: 3,
        message: "execution reverted: Sold out",
    });
    let backup = ScriptedTransport::new(Reply::result(r#""0x1""#));
    let backup_calls = backup.counter();
    let pool = EndpointPool::with_transports(config(2), vec![primary.boxed(), backup.boxed()])
        .unwrap();

    let error = chain_id(&pool).await.unwrap_err();
    assert!(error.contains("execution reverted"));
    assert_eq!(backup_calls.load(Ordering::SeqCst), 0);
}

/// Test that a rate-limited endpoint counts as failed
#[tokio::test(start_paused = true)]
async fn test_rate_limited_endpoint_skipped() {
    let primary = ScriptedTransport::new(Reply::RpcError {
        code: 429,
        message: "Too Many Requests",
    });
    let backup = ScriptedTransport::new(Reply::result(r#""0x89""#));
    let pool = EndpointPool::with_transports(config(2), vec![primary.boxed(), backup.boxed()])
        .unwrap();

    assert_eq!(chain_id(&pool).await, Ok(137));
}

/// Test that total failure surfaces a transport error
#[tokio::test(start_paused = true)]
async fn test_all_endpoints_failing() {
    let transports = (0..3)
        .map(|_| ScriptedTransport::new(Reply::Unreachable).boxed())
        .collect();
    let pool = EndpointPool::with_transports(config(3), transports).unwrap();

    let error = chain_id(&pool).await.unwrap_err();
    assert!(error.contains("connection refused"));
}

/// Test that the last rejected response is preferred over a transport error
#[tokio::test(start_paused = true)]
async fn test_all_failing_returns_rejected_response() {
    let transports = vec![
        ScriptedTransport::new(Reply::RpcError {
            code: 429,
            message: "Too Many Requests",
        })
        .boxed(),
        ScriptedTransport::new(Reply::Unreachable).boxed(),
    ];
    let pool = EndpointPool::with_transports(config(2), transports).unwrap();

    let error = chain_id(&pool).await.unwrap_err();
    assert!(error.contains("Too Many Requests"));
}

/// Test that a pinned chain id mismatch is a configuration error
#[tokio::test(start_paused = true)]
async fn test_chain_pin_mismatch() {
    let pinned = config(1).with_chain_id(1);
    let transport = ScriptedTransport::new(Reply::result(r#""0x2105""#));
    let pool = EndpointPool::with_transports(pinned, vec![transport.boxed()]).unwrap();

    let result = pool.verify_chain().await;
    assert!(matches!(
        result,
        Err(MintrelayError::Config(ConfigError::ChainMismatch {
            expected: 1,
            actual: 8453
        }))
    ));
}

/// Test that an unpinned pool never asks for the chain id
#[tokio::test(start_paused = true)]
async fn test_unpinned_pool_skips_chain_check() {
    let transport = ScriptedTransport::new(Reply::Unreachable);
    let calls = transport.counter();
    let pool = EndpointPool::with_transports(config(1), vec![transport.boxed()]).unwrap();

    assert!(pool.verify_chain().await.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Test that a node reporting neither fee field is priced at the fee floor
#[tokio::test(start_paused = true)]
async fn test_missing_fee_data_falls_back_to_floor() {
    const MINTER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    let transport = ScriptedTransport::new(Reply::Unreachable)
        .answering("eth_getBalance", Reply::result(r#""0xde0b6b3a7640000""#))
        .answering("eth_estimateGas", Reply::result(r#""0x13880""#));
    let pool = EndpointPool::with_transports(config(1), vec![transport.boxed()]).unwrap();
    let client: Arc<dyn ChainClient> = Arc::new(AlloyChainClient::read_only(&pool));

    assert_eq!(client.fee_data().await.unwrap(), FeeData::default());

    let builder = MintCallBuilder::new(
        MINTER,
        address!("1111111111111111111111111111111111111111"),
        "mint",
        1,
        MintMode::Public,
    );
    let report = PreflightValidator::new(client)
        .validate(&builder, MINTER, WeiAmount::from(0u64), None)
        .await
        .unwrap();

    assert_eq!(
        report.fee,
        GasFee::Eip1559 {
            max_fee_per_gas: FEE_FLOOR_WEI,
            max_priority_fee_per_gas: DEFAULT_PRIORITY_FEE_WEI.min(FEE_FLOOR_WEI),
        }
    );
    assert_eq!(report.gas_limit, 96_000);
    assert!(report.feasible);
}

/// Test that a receipt that never arrives ends the wait with a transport-class error
#[tokio::test(start_paused = true)]
async fn test_receipt_wait_is_bounded() {
    let transport =
        ScriptedTransport::new(Reply::result("null")).delayed(Duration::from_secs(3600));
    let pool = EndpointPool::with_transports(config(1), vec![transport.boxed()]).unwrap();
    let client = AlloyChainClient::read_only(&pool);

    let started = tokio::time::Instant::now();
    let error = client
        .wait_for_receipt(TxHash::repeat_byte(0x42))
        .await
        .unwrap_err();

    assert!(!error.is_revert());
    assert!(error.to_string().contains("no receipt within"));
    assert!(started.elapsed() < Duration::from_secs(3600));
}

proptest! {
    /// Property: with one endpoint the pool returns exactly what the endpoint returns
    #[test]
    fn prop_single_endpoint_passthrough(
        chain in any::<u32>(),
        delay_ms in 0u64..10_000,
        fails in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let reply = if fails {
            Reply::Unreachable
        } else {
            Reply::result(format!(r#""{chain:#x}""#))
        };
        let transport = ScriptedTransport::new(reply).delayed(Duration::from_millis(delay_ms));
        let calls = transport.counter();
        let pool = EndpointPool::with_transports(config(1), vec![transport.boxed()]).unwrap();

        let answer = runtime.block_on(chain_id(&pool));

        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
        if fails {
            prop_assert!(answer.is_err());
        } else {
            prop_assert_eq!(answer, Ok(u64::from(chain)));
        }
    }
}
