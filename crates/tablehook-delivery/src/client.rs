//! HTTP client for forwarding notifications to destinations.
//!
//! Each call makes exactly one `POST` attempt. There is no retry, backoff or
//! circuit breaking; the first outcome is final.

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tablehook_core::OutboundNotification;
use tracing::{info_span, Instrument};

use crate::error::{DeliveryError, Result};

/// Configuration for the forwarding client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout. `None` keeps the HTTP client's own default.
    pub timeout: Option<Duration>,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout: None, user_agent: default_user_agent() }
    }
}

/// User agent sent with every forwarded notification.
pub fn default_user_agent() -> String {
    format!("Tablehook/{}", env!("CARGO_PKG_VERSION"))
}

/// Client that posts notifications to destination URLs.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
    config: ClientConfig,
}

/// A single outbound delivery.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    /// Destination URL.
    pub url: String,
    /// Source table, for tracing.
    pub table: String,
    /// Event name, for tracing.
    pub event: &'static str,
    /// JSON-encoded notification.
    pub body: Bytes,
}

impl ForwardRequest {
    /// Encodes `notification` into a request for `url`.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if the notification cannot be serialized.
    pub fn new(url: impl Into<String>, notification: &OutboundNotification) -> serde_json::Result<Self> {
        Ok(Self {
            url: url.into(),
            table: notification.table.clone(),
            event: notification.event,
            body: Bytes::from(notification.to_json_bytes()?),
        })
    }
}

/// Outcome of a delivery that reached the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Whether the status was 2xx.
    pub is_success: bool,
}

impl ForwardClient {
    /// Creates a forwarding client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::ConfigurationError` if the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            DeliveryError::configuration(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    /// Creates a forwarding client with default configuration.
    ///
    /// # Errors
    ///
    /// See [`ForwardClient::new`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Posts the request body to its destination once.
    ///
    /// The response body is discarded unread.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the URL cannot be used
    /// - `Timeout` if a configured timeout elapses
    /// - `NetworkError` for connection and transport failures
    pub async fn forward(&self, request: ForwardRequest) -> Result<ForwardResponse> {
        let span = info_span!(
            "forward_notification",
            table = %request.table,
            event = request.event,
            url = %request.url,
        );

        async move {
            tracing::debug!(body_bytes = request.body.len(), "Sending notification");
            let start_time = Instant::now();

            let response = self
                .client
                .post(&request.url)
                .header(CONTENT_TYPE, "application/json")
                .body(request.body)
                .send()
                .await
                .map_err(|e| self.categorize(&e))?;

            let duration = start_time.elapsed();
            let status = response.status();

            if status.is_success() {
                tracing::info!(
                    status = status.as_u16(),
                    duration_ms = duration.as_millis(),
                    "Notification delivered"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    reason = status.canonical_reason().unwrap_or(""),
                    duration_ms = duration.as_millis(),
                    "Destination rejected notification"
                );
            }

            Ok(ForwardResponse { status_code: status.as_u16(), is_success: status.is_success() })
        }
        .instrument(span)
        .await
    }

    fn categorize(&self, error: &reqwest::Error) -> DeliveryError {
        tracing::warn!(error = %error, "Request failed");

        if error.is_builder() {
            return DeliveryError::invalid_request(error.to_string());
        }
        if error.is_timeout() {
            return DeliveryError::timeout(self.config.timeout.unwrap_or_default());
        }
        if error.is_connect() {
            return DeliveryError::network(format!("connection failed: {error}"));
        }
        DeliveryError::network(error.to_string())
    }
}
