#![no_main]

//! Fuzz target for change event parsing.
//!
//! Feeds arbitrary bytes through the same decode, routing-key and transform
//! steps the forwarding handler runs, checking that none of them panics and
//! that every successfully parsed event produces a notification obeying
//! the field mapping rules.

use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use tablehook_core::{ChangeType, InboundChangeEvent, OutboundNotification};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let Some(table) = InboundChangeEvent::table_of(&body).map(str::to_owned) else {
        return;
    };
    let Ok(event) = InboundChangeEvent::from_value(body) else {
        return;
    };
    assert_eq!(event.table, table);

    let change_type = event.change_type;
    let record = event.record.clone();
    let old_record = event.old_record.clone();

    let notification = OutboundNotification::from_change(event, Utc::now());

    assert_eq!(notification.event, change_type.as_event_name());
    assert_eq!(notification.old_record, old_record);
    match change_type {
        ChangeType::Delete => assert_eq!(notification.record, old_record),
        ChangeType::Insert | ChangeType::Update => assert_eq!(notification.record, record),
    }

    let body = notification.to_json_bytes().expect("parsed rows are always encodable");
    assert!(serde_json::from_slice::<Value>(&body).is_ok());
});
