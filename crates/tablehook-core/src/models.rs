//! Change notification models.
//!
//! Defines the inbound change event emitted by the database trigger and the
//! normalized notification forwarded to destinations. Neither is persisted;
//! each inbound event is transformed exactly once and dropped.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Kind of row change reported by the database.
///
/// Decodes from the upper-case wire form (`INSERT`, `UPDATE`, `DELETE`).
/// Any other value is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// A row was inserted. `record` holds the new row.
    Insert,
    /// A row was updated. `record` holds the new row, `old_record` the
    /// previous one.
    Update,
    /// A row was deleted. Only `old_record` carries row content.
    Delete,
}

impl ChangeType {
    /// Every change type, in wire order.
    pub const ALL: [Self; 3] = [Self::Insert, Self::Update, Self::Delete];

    /// Returns the lower-cased event name used on outbound notifications.
    pub const fn as_event_name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Change notification as delivered by the database webhook trigger.
///
/// Unknown top-level fields (such as `schema`) are ignored. `record` and
/// `old_record` are opaque: any JSON value is carried through unchanged, and
/// a missing row decodes as `null`.
///
/// Decoding happens in two steps. [`InboundChangeEvent::table_of`] reads the
/// routing key from the raw JSON body, and only a routed body is decoded
/// further with [`InboundChangeEvent::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundChangeEvent {
    /// Kind of change.
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Source table name, used only as a routing key.
    pub table: String,
    /// Row state after the change.
    #[serde(default)]
    pub record: Value,
    /// Row state before the change.
    #[serde(default)]
    pub old_record: Value,
}

impl InboundChangeEvent {
    /// Returns the `table` of a decoded body, if it is present and a string.
    ///
    /// Nothing else in the body is looked at.
    pub fn table_of(body: &Value) -> Option<&str> {
        body.get("table").and_then(Value::as_str)
    }

    /// Decodes an event from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for a missing `type` or `table`, or an
    /// unrecognized change type.
    pub fn from_value(body: Value) -> serde_json::Result<Self> {
        serde_json::from_value(body)
    }

    /// Returns the row that represents the current state for this change.
    ///
    /// For deletes the only meaningful content is the row before the change,
    /// so `old_record` is returned; every other type returns `record`.
    pub fn current_record(&self) -> &Value {
        match self.change_type {
            ChangeType::Delete => &self.old_record,
            ChangeType::Insert | ChangeType::Update => &self.record,
        }
    }
}

/// Normalized notification forwarded to a destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundNotification {
    /// Lower-cased change type.
    pub event: &'static str,
    /// Source table name, copied from the inbound event.
    pub table: String,
    /// Current row: `old_record` for deletes, `record` otherwise.
    pub record: Value,
    /// Previous row, copied unconditionally.
    pub old_record: Value,
    /// Time of forwarding, not of the original change.
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl OutboundNotification {
    /// Builds the outbound notification for `event`, stamped with `at`.
    pub fn from_change(event: InboundChangeEvent, at: DateTime<Utc>) -> Self {
        let InboundChangeEvent { change_type, table, record, old_record } = event;

        let record = match change_type {
            ChangeType::Delete => old_record.clone(),
            ChangeType::Insert | ChangeType::Update => record,
        };

        Self { event: change_type.as_event_name(), table, record, old_record, timestamp: at }
    }

    /// Serializes the notification into a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if a row value cannot be serialized.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Formats a timestamp as ISO-8601 UTC with millisecond precision,
/// e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_timestamp<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(at))
}
