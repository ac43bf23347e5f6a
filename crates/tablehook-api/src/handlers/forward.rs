//! Change event forwarding handler.
//!
//! Parses the change event, resolves its table's destination, forwards the
//! normalized notification once, and maps the outcome to a JSON response.
//! Every failure is caught at a single boundary; nothing escapes as an
//! unhandled error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tablehook_core::{InboundChangeEvent, OutboundNotification, RelayError, Result};
use tablehook_delivery::ForwardRequest;
use tracing::{debug, error, info, instrument};

use crate::{config::destination_masked, AppState};

/// Body returned when the destination accepted the notification.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always `true`
    pub success: bool,
}

/// Body returned for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Fixed, caller-facing description of the failure kind
    pub error: &'static str,
}

/// Forwards one change event to its table's destination.
///
/// The request method, query and headers are ignored; only the body is read.
///
/// Returns:
/// - 200 when the destination answered 2xx
/// - 400 when the table has no configured destination
/// - 502 when the destination answered with any other status
/// - 500 for malformed bodies and transport failures
#[instrument(name = "forward_change", skip(state, body), fields(body_bytes = body.len()))]
pub async fn forward_change(State(state): State<AppState>, body: Bytes) -> Response {
    match relay(&state, &body).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => create_error_response(&e),
    }
}

/// Runs the parse, route, transform and forward steps for one event.
///
/// The route is resolved from the raw JSON before the event itself is
/// decoded, so an unrouted table is answered with 400 whatever the rest of
/// the body holds.
async fn relay(state: &AppState, body: &[u8]) -> Result<()> {
    let body: Value = serde_json::from_slice(body).map_err(RelayError::MalformedEvent)?;

    let table = InboundChangeEvent::table_of(&body);
    let Some(url) = table.and_then(|table| state.routes.resolve(table)) else {
        return Err(RelayError::unrouted(table.unwrap_or_default()));
    };

    let event = InboundChangeEvent::from_value(body).map_err(RelayError::MalformedEvent)?;
    debug!(table = %event.table, change_type = %event.change_type, "Parsed change event");

    let notification = OutboundNotification::from_change(event, state.clock.now_utc());
    let request = ForwardRequest::new(url, &notification).map_err(RelayError::Serialization)?;

    let response = state.client.forward(request).await?;
    if !response.is_success {
        return Err(RelayError::delivery_failed(response.status_code));
    }

    info!(
        table = %notification.table,
        event = notification.event,
        destination = %destination_masked(url),
        "Change event forwarded"
    );
    Ok(())
}

/// Logs the failure and builds its response.
fn create_error_response(error: &RelayError) -> Response {
    match error {
        RelayError::UnroutedTable { table } => {
            error!(code = error.code(), table = %table, "No webhook URL configured for table");
        },
        RelayError::DeliveryFailed { status } => {
            error!(code = error.code(), status = *status, "Webhook delivery failed");
        },
        _ => {
            error!(code = error.code(), error = %error, "Error processing change event");
        },
    }

    let kind = error.kind();
    let status =
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse { error: kind.public_message() })).into_response()
}
