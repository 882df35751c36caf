// tests/api.rs
mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use b2stake_client::api::router;
use b2stake_client::utils::normalize_address;
use common::*;
use serde_json::Value;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn pool_endpoint_returns_named_fields() {
    let (client, mock) = connect().await;
    respond(&mock, vec![value(pool_payload(10))]);

    let (status, body) = get(router(client), "/pools/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poolWeight"], "10");
    assert_eq!(
        body["stTokenAddress"],
        normalize_address(POOL_ADDRESS).unwrap()
    );
}

#[tokio::test]
async fn user_endpoint_rejects_malformed_address() {
    let (client, _mock) = connect().await;

    let (status, body) = get(router(client), "/users/0x1234/1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ADDRESS");
}

#[tokio::test]
async fn user_endpoint_returns_record() {
    let (client, mock) = connect().await;
    respond(&mock, vec![value(user_payload(200))]);

    let uri = format!("/users/{USER_ADDRESS}/1");
    let (status, body) = get(router(client), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stAmount"], "200");
}

#[tokio::test]
async fn reward_endpoint_normalizes_user() {
    let (client, mock) = connect().await;
    respond(&mock, vec![value(uint_payload(1000))]);

    let uri = format!("/rewards/1/{USER_ADDRESS}");
    let (status, body) = get(router(client), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pid"], 1);
    assert_eq!(body["reward"], "1000");
    assert_eq!(body["user"], normalize_address(USER_ADDRESS).unwrap());
}

#[tokio::test]
async fn unreachable_node_maps_to_service_unavailable() {
    let (client, _mock) = connect().await;

    let (status, body) = get(router(client), "/pools/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "TRANSPORT_ERROR");
}

#[tokio::test]
async fn reverted_read_maps_to_unprocessable() {
    let (client, mock) = connect().await;
    respond(&mock, vec![rpc_error(3, "execution reverted")]);

    let (status, body) = get(router(client), "/pools/42").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "CALL_REVERTED");
}

#[tokio::test]
async fn rate_limited_node_maps_to_service_unavailable() {
    let (client, mock) = connect().await;
    respond(&mock, vec![rpc_error(-32005, "limit exceeded")]);

    let (status, body) = get(router(client), "/pools/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "TRANSPORT_ERROR");
}
