//! Health check handlers for service monitoring.
//!
//! The service has no backing store, so health reduces to the process being
//! up and reporting how many tables have a destination.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when health check was performed
    pub timestamp: DateTime<Utc>,
    /// Number of tables with a configured destination
    pub routes_configured: usize,
    /// Service name
    pub service: &'static str,
    /// Service version information
    pub version: &'static str,
}

/// Overall health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Serving requests with at least one route
    Healthy,
    /// Serving requests, but every event will be rejected as unrouted
    Degraded,
}

/// Health check endpoint handler.
///
/// Always answers 200; `degraded` signals that no route is configured.
#[instrument(name = "health_check", skip(app_state))]
pub async fn health_check(State(app_state): State<AppState>) -> Response {
    let routes_configured = app_state.routes.len();
    let status =
        if routes_configured == 0 { HealthStatus::Degraded } else { HealthStatus::Healthy };

    debug!(status = ?status, routes_configured, "Health check completed");

    let response = HealthResponse {
        status,
        timestamp: app_state.clock.now_utc(),
        routes_configured,
        service: "tablehook",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Liveness check endpoint for orchestration probes.
#[instrument(name = "liveness_check", skip(app_state))]
pub async fn liveness_check(State(app_state): State<AppState>) -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": app_state.clock.now_utc(),
        "service": "tablehook"
    });

    (StatusCode::OK, Json(response)).into_response()
}
