// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the HTTP page fetcher against a local mock server

use std::time::Duration;

use httpmock::prelude::*;
use mintrelay::discovery::{HttpPageFetcher, PageFetcher};
use mintrelay::DiscoveryError;

/// Test that pages are requested with a browser-like user agent
#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/collection/example")
                .header("user-agent", "Mozilla/5.0");
            then.status(200).body("<html>0x1111111111111111111111111111111111111111</html>");
        })
        .await;

    let fetcher = HttpPageFetcher::new().unwrap();
    let body = fetcher
        .fetch(&server.url("/collection/example"))
        .await
        .unwrap();

    page.assert_async().await;
    assert!(body.contains("0x1111111111111111111111111111111111111111"));
}

/// Test that a non-success status is reported with its code
#[tokio::test]
async fn test_fetch_reports_http_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        })
        .await;

    let fetcher = HttpPageFetcher::new().unwrap();
    let result = fetcher.fetch(&server.url("/missing")).await;

    assert!(matches!(
        result,
        Err(DiscoveryError::HttpStatus { status: 404, .. })
    ));
}

/// Test that a whitespace-only body is an empty page
#[tokio::test]
async fn test_fetch_empty_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/blank");
            then.status(200).body("  \n ");
        })
        .await;

    let fetcher = HttpPageFetcher::new().unwrap();
    let result = fetcher.fetch(&server.url("/blank")).await;

    assert!(matches!(result, Err(DiscoveryError::EmptyPage { .. })));
}

/// Test that a server slower than the timeout is a fetch failure
#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .body("late")
                .delay(Duration::from_millis(500));
        })
        .await;

    let fetcher = HttpPageFetcher::with_timeout(Duration::from_millis(50)).unwrap();
    let result = fetcher.fetch(&server.url("/slow")).await;

    assert!(matches!(result, Err(DiscoveryError::Fetch { .. })));
}
