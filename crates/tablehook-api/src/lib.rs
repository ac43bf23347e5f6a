//! Tablehook HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod handlers;
pub mod server;

use std::sync::Arc;

use anyhow::Context;
pub use config::Config;
pub use server::{create_router, serve, start_server};
use tablehook_core::{Clock, RealClock, RouteTable};
use tablehook_delivery::ForwardClient;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Table-to-destination routes, fixed for the process lifetime
    pub routes: Arc<RouteTable>,
    /// Outbound HTTP client
    pub client: ForwardClient,
    /// Source of forwarding timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates application state using the system clock.
    pub fn new(routes: RouteTable, client: ForwardClient) -> Self {
        Self { routes: Arc::new(routes), client, clock: Arc::new(RealClock::new()) }
    }

    /// Replaces the clock used for forwarding timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds application state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails if the outbound HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ForwardClient::new(config.to_client_config())
            .context("Failed to build forwarding client")?;
        Ok(Self::new(config.route_table(), client))
    }
}
