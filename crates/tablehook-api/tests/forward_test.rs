//! Integration tests for the change event forwarding endpoint.
//!
//! Drives the router in-process with `oneshot` and uses a wiremock server as
//! the destination, covering each outcome of the forwarding pipeline.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tablehook_api::{create_router, AppState};
use tablehook_core::{ChangeType, RouteTable};
use tablehook_delivery::ForwardClient;
use tablehook_testing::{change_event, routes_to, to_body, unreachable_url, MockDestination, TestClock};
use tower::ServiceExt;

/// 2024-05-01T12:00:00Z
const FIXED_EPOCH_SECS: u64 = 1_714_564_800;

fn app_with_routes(routes: RouteTable) -> Router {
    let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(FIXED_EPOCH_SECS));
    let client = ForwardClient::with_defaults().expect("client");
    create_router(AppState::new(routes, client).with_clock(Arc::new(clock)))
}

async fn send(app: Router, method: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.expect("router should respond");
    let status = response.status();
    assert_eq!(
        response.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json"),
        "every response is JSON"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).expect("response body should be JSON"))
}

#[tokio::test]
async fn insert_is_forwarded_with_record() {
    let destination = MockDestination::start().await;
    destination.accept("/recruits").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let event =
        change_event(ChangeType::Insert, "recruits", json!({"id": 1, "name": "A"}), json!({}));
    let (status, body) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let received = destination.received_notifications().await;
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "event": "insert",
            "table": "recruits",
            "record": {"id": 1, "name": "A"},
            "old_record": {},
            "timestamp": "2024-05-01T12:00:00.000Z"
        })
    );
}

#[tokio::test]
async fn delete_forwards_old_record_as_record() {
    let destination = MockDestination::start().await;
    destination.accept("/portal").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let event = change_event(ChangeType::Delete, "portal", json!({}), json!({"id": 5}));
    let (status, _) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::OK);

    let received = destination.received_notifications().await;
    assert_eq!(received[0]["event"], "delete");
    assert_eq!(received[0]["record"], json!({"id": 5}));
    assert_eq!(received[0]["old_record"], json!({"id": 5}));
}

#[tokio::test]
async fn update_keeps_both_rows() {
    let destination = MockDestination::start().await;
    destination.accept("/recruits").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let event = change_event(
        ChangeType::Update,
        "recruits",
        json!({"id": 7, "stars": 4}),
        json!({"id": 7, "stars": 3}),
    );
    let (status, _) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::OK);

    let received = destination.received_notifications().await;
    assert_eq!(received[0]["event"], "update");
    assert_eq!(received[0]["record"], json!({"id": 7, "stars": 4}));
    assert_eq!(received[0]["old_record"], json!({"id": 7, "stars": 3}));
}

#[tokio::test]
async fn unrouted_table_is_rejected_without_forwarding() {
    let destination = MockDestination::start().await;
    destination.accept("/recruits").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let event = change_event(ChangeType::Update, "unknown_table", json!({}), json!({}));
    let (status, body) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No webhook URL configured"}));
    destination.assert_request_count(0).await;
}

#[tokio::test]
async fn unrouted_table_is_rejected_whatever_the_body_holds() {
    let bodies = [
        json!({"type": "TRUNCATE", "table": "unknown_table", "record": {}, "old_record": {}}),
        json!({"type": "UPDATE", "table": "unknown_table", "record": [1], "old_record": "x"}),
        json!({"table": "unknown_table"}),
        json!({"type": "INSERT", "record": {"id": 1}}),
        json!({"type": "INSERT", "table": 42, "record": {"id": 1}}),
        json!([1, 2, 3]),
    ];

    for body in bodies {
        let destination = MockDestination::start().await;
        destination.accept("/recruits").await;
        destination.accept("/portal").await;
        let app = app_with_routes(routes_to(&destination.url()));

        let (status, response) = send(app, "POST", to_body(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response, json!({"error": "No webhook URL configured"}), "body: {body}");
        destination.assert_request_count(0).await;
    }
}

#[tokio::test]
async fn rows_are_forwarded_whatever_their_shape() {
    let destination = MockDestination::start().await;
    destination.accept("/portal").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let body = to_body(&json!({
        "type": "UPDATE",
        "table": "portal",
        "record": [1, 2],
        "old_record": "previous"
    }));
    let (status, _) = send(app, "POST", body).await;

    assert_eq!(status, StatusCode::OK);

    let received = destination.received_notifications().await;
    assert_eq!(received[0]["record"], json!([1, 2]));
    assert_eq!(received[0]["old_record"], json!("previous"));
}

#[tokio::test]
async fn known_table_without_url_is_unrouted() {
    let destination = MockDestination::start().await;
    let routes = RouteTable::new().with_route("recruits", destination.endpoint_url("/recruits"));
    let app = app_with_routes(routes);

    let event = change_event(ChangeType::Insert, "portal", json!({"id": 1}), Value::Null);
    let (status, body) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No webhook URL configured");
    destination.assert_request_count(0).await;
}

#[tokio::test]
async fn destination_failure_is_bad_gateway() {
    for failing_status in [400, 404, 500, 503] {
        let destination = MockDestination::start().await;
        destination.respond_with_status("/portal", failing_status).await;
        let app = app_with_routes(routes_to(&destination.url()));

        let event = change_event(ChangeType::Insert, "portal", json!({"id": 2}), Value::Null);
        let (status, body) = send(app, "POST", to_body(&event)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY, "destination answered {failing_status}");
        assert_eq!(body, json!({"error": "Webhook delivery failed"}));
        destination.assert_request_count(1).await;
    }
}

#[tokio::test]
async fn unreachable_destination_is_internal_error() {
    let routes = RouteTable::new().with_route("recruits", unreachable_url());
    let app = app_with_routes(routes);

    let event = change_event(ChangeType::Insert, "recruits", json!({"id": 1}), Value::Null);
    let (status, body) = send(app, "POST", to_body(&event)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal error"}));
}

#[tokio::test]
async fn malformed_json_is_internal_error() {
    let destination = MockDestination::start().await;
    let app = app_with_routes(routes_to(&destination.url()));

    let (status, body) = send(app, "POST", b"{\"type\": \"INSERT\", \"table\":".to_vec()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal error"}));
    destination.assert_request_count(0).await;
}

#[tokio::test]
async fn unknown_change_type_is_internal_error() {
    let destination = MockDestination::start().await;
    let app = app_with_routes(routes_to(&destination.url()));

    let body = to_body(&json!({
        "type": "TRUNCATE",
        "table": "recruits",
        "record": {},
        "old_record": {}
    }));
    let (status, _) = send(app, "POST", body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    destination.assert_request_count(0).await;
}

#[tokio::test]
async fn empty_body_is_internal_error() {
    let app = app_with_routes(RouteTable::new());

    let (status, body) = send(app, "POST", Vec::new()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal error");
}

#[tokio::test]
async fn request_method_is_not_consulted() {
    let destination = MockDestination::start().await;
    destination.accept("/recruits").await;
    let app = app_with_routes(routes_to(&destination.url()));

    let event = change_event(ChangeType::Insert, "recruits", json!({"id": 3}), Value::Null);
    let (status, _) = send(app, "PUT", to_body(&event)).await;

    assert_eq!(status, StatusCode::OK);
    destination.assert_request_count(1).await;
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app_with_routes(RouteTable::new());

    let request = Request::builder().method("GET").uri("/live").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
