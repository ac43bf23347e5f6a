//! HTTP request handlers.
//!
//! - `forward` - change event intake and forwarding
//! - `health` - health and liveness probes
//!
//! Every handler answers with a JSON body.

pub mod forward;
pub mod health;

pub use forward::forward_change;
pub use health::{health_check, liveness_check};
