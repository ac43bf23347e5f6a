//! Shared test infrastructure for tablehook crates.
//!
//! Provides mock webhook destinations backed by wiremock and change event
//! fixtures in the trigger's wire format.

pub mod fixtures;
pub mod http;

pub use fixtures::{change_event, routes_to, to_body};
pub use http::{unreachable_url, MockDestination};
pub use tablehook_core::TestClock;
