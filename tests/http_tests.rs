//! HTTP Tests: default reqwest transport against an in-process axum backend
//!
//! These tests verify:
//! 1. Paths, query strings and bodies reach the server as sent
//! 2. Error bodies (structured, plain, empty) classify correctly over the wire
//! 3. Binary payloads go out as octet-stream
//! 4. Connection and timeout failures are TRANSPORT

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use bcc_client::{Amount, BccClient, Payment};
use serde_json::{json, Value};
use tokio::runtime::Handle;

fn wallet_json(id: &str) -> Value {
    json!({
        "id": id,
        "address_pool_gap": 20,
        "balance": {
            "available": {"quantity": 42000000, "unit": "entropic"},
            "reward": {"quantity": 0, "unit": "entropic"},
            "total": {"quantity": 42000000, "unit": "entropic"}
        },
        "name": "Alan's Wallet",
        "state": {"status": "syncing", "progress": {"quantity": 42.0, "unit": "percent"}},
        "tip": {"epoch_number": 14, "slot_number": 1337}
    })
}

async fn get_wallet(Path(id): Path<String>) -> Json<Value> { Json(wallet_json(&id)) }

async fn delete_wallet(Path(_id): Path<String>) -> StatusCode { StatusCode::NO_CONTENT }

async fn list_addresses(Path(_id): Path<String>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let state = q.get("state").cloned().unwrap_or_else(|| "used".into());
    Json(json!([
        {"id": format!("addr_newest_{state}"), "state": state},
        {"id": format!("addr_oldest_{state}"), "state": state}
    ]))
}

async fn create_transaction(Path(_id): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let requested = body["payments"][0]["amount"]["quantity"].as_u64().unwrap_or_default();
    let message = format!("cannot cover {requested} entropic with withdrawal {}", body["withdrawal"]);
    (StatusCode::FORBIDDEN, Json(json!({"code": "not_enough_money", "message": message})))
}

async fn external_transaction(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    if content_type != "application/octet-stream" {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(json!({"code": "unsupported_media_type", "message": content_type})));
    }
    (StatusCode::ACCEPTED, Json(json!({"id": hex::encode(&body)})))
}

async fn network_clock() -> (StatusCode, &'static str) { (StatusCode::BAD_GATEWAY, "upstream node unavailable") }

async fn slow_info() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

fn backend() -> Router {
    Router::new()
        .route("/v2/wallets/:id", get(get_wallet).delete(delete_wallet))
        .route("/v2/wallets/:id/addresses", get(list_addresses))
        .route("/v2/wallets/:id/transactions", post(create_transaction))
        .route("/v2/proxy/transactions", post(external_transaction))
        .route("/v2/network/clock", get(network_clock))
        .route("/v2/network/information", get(slow_info))
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve") });
    addr
}

fn client_for(addr: SocketAddr) -> BccClient {
    BccClient::builder(format!("http://{addr}/v2"))
        .with_runtime(Handle::current())
        .with_request_timeout(Duration::from_millis(500))
        .build()
        .expect("client")
}

/// Test: wallet snapshot round trip over real HTTP
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn get_and_delete_wallet_over_http() {
    let client = client_for(serve(backend()).await);

    let wallet = client.get_wallet("2512a00e").await.expect("wallet");
    assert_eq!(wallet.id, "2512a00e");
    assert_eq!(wallet.balance.total, Amount::entropic(42_000_000));

    client.delete_wallet("2512a00e").await.expect("204 is success");
}

/// Test: query filter reaches the server and order is kept
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn list_addresses_over_http() {
    let client = client_for(serve(backend()).await);

    let unused = client.list_addresses("w1", Some(bcc_client::AddressFilter::Unused)).await.expect("addresses");
    let ids: Vec<_> = unused.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["addr_newest_unused", "addr_oldest_unused"]);
}

/// Test: structured 403 body becomes the backend code; body carried the defaults
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn structured_error_over_http() {
    let client = client_for(serve(backend()).await);

    let payments = vec![Payment::new("addr1", Amount::entropic(7))];
    let err = client.create_transaction("w1", "passphrase", payments).await.expect_err("403");
    assert_eq!(err.code(), "not_enough_money");
    assert_eq!(err.message(), "cannot cover 7 entropic with withdrawal \"self\"");
    assert_eq!(err.status(), Some(403));
}

/// Test: plain-text and empty error bodies are UNKNOWN
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unstructured_errors_over_http() {
    let client = client_for(serve(backend()).await);

    let err = client.network_clock().await.expect_err("502");
    assert_eq!(err.code(), bcc_client::error::UNKNOWN);
    assert_eq!(err.message(), "upstream node unavailable");

    let err = client.network_parameters().await.expect_err("404");
    assert_eq!(err.code(), bcc_client::error::UNKNOWN);
    assert_eq!(err.status(), Some(404));
}

/// Test: signed transactions are posted as raw bytes
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn external_transaction_is_octet_stream() {
    let client = client_for(serve(backend()).await);

    let accepted = client.post_external_transaction("82a400818258").await.expect("accepted");
    assert_eq!(accepted.id, "82a400818258");
}

/// Test: a closed port is TRANSPORT
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connection_refused_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = client_for(addr).list_wallets().await.expect_err("refused");
    assert_eq!(err.code(), bcc_client::error::TRANSPORT);
}

/// Test: the configured request timeout is reported as TRANSPORT
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn request_timeout_is_transport() {
    let client = client_for(serve(backend()).await);

    let err = client.network_info().await.expect_err("timeout");
    assert_eq!(err.code(), bcc_client::error::TRANSPORT);
}

/// Test: the default owned runtime serves requests issued from another runtime
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn owned_runtime_over_http() {
    let addr = serve(backend()).await;
    let client = BccClient::builder(format!("http://{addr}/v2/")).with_worker_threads(1).build().expect("client");

    let wallet = client.get_wallet("owned").await.expect("wallet");
    assert_eq!(wallet.id, "owned");
    client.shutdown();
    assert_eq!(client.get_wallet("owned").await.expect_err("closed").code(), bcc_client::error::CLOSED);
}
