//! Change event fixtures in the database trigger's wire format.

use serde_json::{json, Value};
use tablehook_core::{ChangeType, RouteTable};

/// Builds a change event body as the database trigger would send it.
pub fn change_event(change_type: ChangeType, table: &str, record: Value, old_record: Value) -> Value {
    json!({
        "type": change_type.to_string(),
        "table": table,
        "schema": "public",
        "record": record,
        "old_record": old_record
    })
}

/// Serializes a fixture into request body bytes.
pub fn to_body(event: &Value) -> Vec<u8> {
    serde_json::to_vec(event).unwrap_or_default()
}

/// Route table with both deployment tables pointed at `base_url`.
///
/// `recruits` maps to `{base_url}/recruits` and `portal` to
/// `{base_url}/portal`.
pub fn routes_to(base_url: &str) -> RouteTable {
    RouteTable::new()
        .with_route("recruits", format!("{base_url}/recruits"))
        .with_route("portal", format!("{base_url}/portal"))
}
