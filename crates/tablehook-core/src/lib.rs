//! Core types for forwarding database change notifications.
//!
//! Provides the inbound event and outbound notification models, the static
//! route table, the error taxonomy, and the clock used to stamp forwarded
//! notifications.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod error;
pub mod models;
pub mod routes;
pub mod time;

pub use error::{ErrorKind, RelayError, Result};
pub use models::{format_timestamp, ChangeType, InboundChangeEvent, OutboundNotification};
pub use routes::{RouteTable, ROUTED_TABLES};
pub use time::{Clock, RealClock, TestClock};
