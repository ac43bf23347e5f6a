//! Outbound delivery of change notifications.
//!
//! Wraps a `reqwest` client that posts one JSON notification per call and
//! reports whether the destination accepted it. Retry policy, if any, belongs
//! to whoever sent the original change event.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

pub mod client;
pub mod error;

pub use client::{ClientConfig, ForwardClient, ForwardRequest, ForwardResponse};
pub use error::{DeliveryError, Result};
