//! Tablehook change notification relay.
//!
//! Main entry point. Loads configuration, builds the route table once, and
//! serves change events until shutdown.

use anyhow::{Context, Result};
use tablehook_api::{config::destination_masked, AppState, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config.rust_log);

    info!("Starting tablehook change notification relay");

    let addr = config.parse_server_addr()?;
    let state = AppState::from_config(&config)?;

    for (table, variable) in tablehook_core::ROUTED_TABLES {
        match state.routes.resolve(table) {
            Some(url) => info!(table, destination = %destination_masked(url), "Route configured"),
            None => warn!(table, variable, "No destination configured; events will be rejected"),
        }
    }

    info!(
        addr = %addr,
        routes = state.routes.len(),
        delivery_timeout_seconds = ?config.delivery_timeout_seconds,
        "Configuration loaded"
    );

    tablehook_api::start_server(state, addr).await.context("HTTP server failed")?;

    info!("Tablehook shutdown complete");
    Ok(())
}

/// Initializes tracing, preferring `RUST_LOG` from the environment over the
/// configured default.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info,tablehook=debug,tower_http=debug"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
