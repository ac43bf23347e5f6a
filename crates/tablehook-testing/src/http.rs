//! Mock destination endpoints for forwarding tests.

use serde_json::Value;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wiremock server standing in for a webhook destination.
pub struct MockDestination {
    server: MockServer,
}

impl MockDestination {
    /// Starts a new mock destination on a random port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Returns the base URL of the mock server.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Returns the full URL for `endpoint_path` on the mock server.
    pub fn endpoint_url(&self, endpoint_path: &str) -> String {
        format!("{}{}", self.server.uri(), endpoint_path)
    }

    /// Answers JSON `POST`s on `endpoint_path` with `status`.
    pub async fn respond_with_status(&self, endpoint_path: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(endpoint_path))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answers JSON `POST`s on `endpoint_path` with 200 OK.
    pub async fn accept(&self, endpoint_path: &str) {
        self.respond_with_status(endpoint_path, 200).await;
    }

    /// Returns the decoded JSON body of every request received so far.
    ///
    /// Bodies that are not valid JSON are returned as `Value::Null`.
    pub async fn received_notifications(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
            .collect()
    }

    /// Asserts that exactly `expected` requests were received.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.server.received_requests().await.unwrap_or_default().len();
        assert_eq!(received, expected, "Expected {expected} requests, received {received}");
    }
}

/// Returns a URL on a local port with nothing listening on it.
///
/// The port is reserved by binding and released immediately, so connecting
/// to it is refused.
pub fn unreachable_url() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap_or(9);
    format!("http://127.0.0.1:{port}/webhook")
}
