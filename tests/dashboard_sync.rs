//! End-to-end checks of the dashboard client and store against a mock bot API.

use httpmock::prelude::*;
use kalshiguard::config::ServerConfig;
use kalshiguard::error::SyncError;
use kalshiguard::feeds::dashboard_client::DashboardClient;
use kalshiguard::state::store::DashboardStore;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn online_payload() -> Value {
    json!({
        "status": "ONLINE",
        "last_updated": "2024-01-01T00:00:00Z",
        "phase": "test",
        "portfolio": {
            "bankroll_start": 50,
            "portfolio_value": 51.25,
            "daily_pnl": 1.25,
            "daily_pnl_percent": 2.5,
            "total_exposure": 3.1,
            "buying_power": 48.15,
            "live_trading": false
        },
        "positions": [],
        "history": []
    })
}

fn client_for(server: &MockServer, token: Option<&str>) -> DashboardClient {
    let mut config = ServerConfig::with_base_url(server.base_url());
    config.api_token = token.map(String::from);
    DashboardClient::new(config).unwrap()
}

fn store_for(server: &MockServer) -> DashboardStore {
    DashboardStore::new(Arc::new(client_for(server, None)), Duration::from_secs(12))
}

// ---------------------------------------------------------------------------
// fetch_snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_online_snapshot() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(online_payload());
        })
        .await;

    let snap = client_for(&server, None).fetch_snapshot().await.unwrap();

    mock.assert_async().await;
    assert_eq!(snap.status, "ONLINE");
    assert_eq!(snap.phase, "test");
    assert!(snap.positions.is_empty());
    assert!(snap.history.is_empty());
    assert_eq!(snap.portfolio.portfolio_value, dec!(51.25));
    assert_eq!(snap.portfolio.buying_power, dec!(48.15));
}

#[tokio::test]
async fn fetch_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ios/dashboard")
                .header("authorization", "Bearer phase-g-token");
            then.status(200).json_body(online_payload());
        })
        .await;

    let result = client_for(&server, Some("phase-g-token")).fetch_snapshot().await;

    assert!(result.is_ok(), "fetch failed: {:?}", result.err());
    mock.assert_async().await;
}

#[tokio::test]
async fn fetch_unauthorized_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(401).json_body(json!({"error": "unauthorized"}));
        })
        .await;

    let err = client_for(&server, None).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, SyncError::Server { status: 401 }), "got {err}");
}

#[tokio::test]
async fn fetch_500_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(500).body("internal error");
        })
        .await;

    let err = client_for(&server, None).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, SyncError::Server { status: 500 }), "got {err}");
}

#[tokio::test]
async fn fetch_missing_field_is_decode_error() {
    let server = MockServer::start_async().await;
    let mut payload = online_payload();
    payload["portfolio"].as_object_mut().unwrap().remove("buying_power");
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(200).json_body(payload);
        })
        .await;

    let err = client_for(&server, None).fetch_snapshot().await.unwrap_err();
    assert!(err.is_decode(), "got {err}");
}

#[tokio::test]
async fn fetch_non_json_body_is_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = client_for(&server, None).fetch_snapshot().await.unwrap_err();
    assert!(err.is_decode(), "got {err}");
}

// ---------------------------------------------------------------------------
// Store against the mock server
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_keeps_snapshot_on_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(500);
        })
        .await;

    let store = store_for(&server);
    let before = store.current().snapshot;

    assert!(!store.refresh().await);

    let state = store.current();
    assert_eq!(*before, *state.snapshot);
    assert!(!state.is_refreshing);
    let err = state.last_error.expect("error should be published");
    assert!(!err.is_empty());
    assert!(err.contains("500"));
}

#[tokio::test]
async fn store_keeps_snapshot_on_bad_timestamp() {
    let server = MockServer::start_async().await;
    let mut payload = online_payload();
    payload["last_updated"] = json!("Jan 1 2024");
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(200).json_body(payload);
        })
        .await;

    let store = store_for(&server);
    let before = store.current().snapshot;

    assert!(!store.refresh().await);

    let state = store.current();
    assert_eq!(*before, *state.snapshot);
    assert!(state.last_error.unwrap().contains("decode error"));
}

#[tokio::test]
async fn store_publishes_fetched_snapshot() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ios/dashboard");
            then.status(200).json_body(online_payload());
        })
        .await;

    let store = store_for(&server);
    store.publisher().publish_error("stale");
    let mut rx = store.subscribe();

    assert!(store.refresh().await);

    let state = rx.borrow_and_update().clone();
    assert_eq!(state.snapshot.phase, "test");
    assert_eq!(state.snapshot.portfolio.daily_pnl, dec!(1.25));
    assert!(state.last_error.is_none());
    assert!(!state.is_refreshing);
}

// ---------------------------------------------------------------------------
// send_approval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approval_posts_exact_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/execute_approved")
                .header("content-type", "application/json")
                .json_body(json!({"approval_id": "abc-123", "approved": true}));
            then.status(200).json_body(json!({"status": "EXECUTED"}));
        })
        .await;

    let result = client_for(&server, None).send_approval("abc-123").await;

    assert!(result.is_ok(), "approval failed: {:?}", result.err());
    mock.assert_async().await;
}

#[tokio::test]
async fn approval_with_other_body_does_not_match() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/execute_approved")
                .json_body(json!({"approval_id": "abc-123", "approved": true}));
            then.status(200);
        })
        .await;

    let err = client_for(&server, None).send_approval("xyz-999").await.unwrap_err();

    assert!(err.is_server(), "got {err}");
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn approval_carries_token_and_accepts_any_2xx() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/execute_approved")
                .header("authorization", "Bearer phase-g-token");
            then.status(202).json_body(json!({"status": "WAITING_FOR_APPROVAL"}));
        })
        .await;

    let result = client_for(&server, Some("phase-g-token"))
        .send_approval("abc-123")
        .await;

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn store_reports_rejected_approval() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/execute_approved");
            then.status(400).json_body(json!({"error": "approved must be true"}));
        })
        .await;

    let store = store_for(&server);
    assert!(!store.send_approval("abc-123").await);

    // Single attempt, no retry
    assert_eq!(mock.hits_async().await, 1);
    assert!(store
        .current()
        .last_error
        .unwrap()
        .starts_with("Approval call failed:"));
}
