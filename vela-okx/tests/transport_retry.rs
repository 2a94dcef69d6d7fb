use std::time::Duration;

use httpmock::prelude::*;
use vela_core::{BatchRequest, CandleSource, Endpoint, Interval, VelaError};
use vela_okx::{Credentials, OkxConnector, RateLimitedTransport, RequestSigner, TransportConfig};

fn fast_config(max_attempts: u32) -> TransportConfig {
    TransportConfig {
        max_attempts,
        backoff_base: Duration::from_millis(1),
        backoff_jitter_percent: 0,
        timeout: Duration::from_secs(5),
        max_in_flight: 2,
    }
}

fn transport(server: &MockServer, max_attempts: u32) -> RateLimitedTransport {
    let signer = RequestSigner::new(Credentials::new("k", "s", "p")).unwrap();
    RateLimitedTransport::new(&server.base_url(), signer, fast_config(max_attempts)).unwrap()
}

#[tokio::test]
async fn server_errors_are_retried_until_the_budget_is_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(503);
    });

    let err = transport(&server, 3)
        .get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=10")
        .await
        .unwrap_err();

    assert!(matches!(err, VelaError::Transient { .. }));
    mock.assert_hits(3);
}

#[tokio::test]
async fn successful_envelope_yields_rows() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(200).json_body(serde_json::json!({
            "code": "0",
            "msg": "",
            "data": [["1700000000000", "1", "2", "0.5", "1.5", "10"]]
        }));
    });

    let rows = transport(&server, 3)
        .get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=1")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "1700000000000");
}

#[tokio::test]
async fn auth_failures_are_fatal_and_never_retried() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(401);
    });

    let err = transport(&server, 5)
        .get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=10")
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    mock.assert_hits(1);
}

#[tokio::test]
async fn rate_limiting_is_retried_with_backoff() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(429).header("Retry-After", "0");
    });

    let err = transport(&server, 2)
        .get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=10")
        .await
        .unwrap_err();

    assert!(matches!(err, VelaError::RateLimited { .. }));
    mock.assert_hits(2);
}

#[tokio::test]
async fn application_error_codes_are_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(200).json_body(serde_json::json!({
            "code": "51001",
            "msg": "Instrument ID does not exist",
            "data": []
        }));
    });

    let err = transport(&server, 5)
        .get_rows("/api/v5/market/candles?instId=NOPE&bar=4H&limit=10")
        .await
        .unwrap_err();

    assert!(matches!(err, VelaError::Data(_)));
    mock.assert_hits(1);
}

#[tokio::test]
async fn clones_share_one_in_flight_limiter() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/v5/market/candles");
        then.status(200)
            .delay(Duration::from_millis(200))
            .json_body(serde_json::json!({"code": "0", "msg": "", "data": []}));
    });

    let signer = RequestSigner::new(Credentials::new("k", "s", "p")).unwrap();
    let cfg = TransportConfig {
        max_in_flight: 1,
        ..fast_config(1)
    };
    let transport = RateLimitedTransport::new(&server.base_url(), signer, cfg).unwrap();
    let clone = transport.clone();

    // With a single permit the two calls cannot overlap, so the wall time
    // is at least the sum of both response delays.
    let started = std::time::Instant::now();
    let (a, b) = tokio::join!(
        transport.get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=1"),
        clone.get_rows("/api/v5/market/candles?instId=X&bar=4H&limit=1"),
    );
    a.unwrap();
    b.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn connector_sends_signed_paginated_requests() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v5/market/history-candles")
            .query_param("instId", "BTC-USD-SWAP")
            .query_param("bar", "4H")
            .query_param("limit", "300")
            .query_param("after", "1700000000000")
            .header_exists("OK-ACCESS-KEY")
            .header_exists("OK-ACCESS-SIGN")
            .header_exists("OK-ACCESS-TIMESTAMP")
            .header_exists("OK-ACCESS-PASSPHRASE");
        then.status(200).json_body(serde_json::json!({
            "code": "0",
            "msg": "",
            "data": [["1699985600000", "1", "2", "0.5", "1.5", "10"]]
        }));
    });

    let connector = OkxConnector::builder(Credentials::new("k", "s", "p"))
        .base_url(server.base_url())
        .transport(fast_config(2))
        .build()
        .unwrap();

    let watermark = chrono::DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
    let req = BatchRequest::new("BTC-USD-SWAP", Interval::Hour4, 300, Endpoint::Historical)
        .with_watermark(vela_core::CursorParam::After, watermark);
    let candles = connector.fetch_batch(&req).await.unwrap();

    assert_eq!(candles.len(), 1);
    assert!(candles[0].is_closed);
    mock.assert();
}

#[tokio::test]
async fn latest_returns_the_open_bucket_unclosed() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v5/market/candles")
            .query_param("limit", "1");
        then.status(200).json_body(serde_json::json!({
            "code": "0",
            "msg": "",
            "data": [["1700000000000", "1", "2", "0.5", "1.5", "10"]]
        }));
    });

    let connector = OkxConnector::builder(Credentials::new("k", "s", "p"))
        .base_url(server.base_url())
        .transport(fast_config(2))
        .build()
        .unwrap();

    let candle = connector
        .latest("BTC-USD-SWAP", Interval::Hour4)
        .await
        .unwrap()
        .expect("candle");
    assert!(!candle.is_closed);
}
