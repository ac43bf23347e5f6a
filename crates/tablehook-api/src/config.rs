//! Configuration management for the tablehook service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tablehook_core::{RouteTable, ROUTED_TABLES};
use tablehook_delivery::client::{default_user_agent, ClientConfig};

const CONFIG_FILE: &str = "config.toml";

/// Service configuration with defaults, file, and environment overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// Destination URLs are optional. A table whose URL is unset or blank has
/// no route, and change events for it are answered with 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,

    // Routes
    /// Destination for the `recruits` table.
    ///
    /// Environment variable: `RECRUITS_WEBHOOK_URL`
    #[serde(default, alias = "RECRUITS_WEBHOOK_URL")]
    pub recruits_webhook_url: Option<String>,
    /// Destination for the `portal` table.
    ///
    /// Environment variable: `PORTAL_WEBHOOK_URL`
    #[serde(default, alias = "PORTAL_WEBHOOK_URL")]
    pub portal_webhook_url: Option<String>,

    // Client
    /// Outbound request timeout in seconds. Unset keeps the HTTP client
    /// default.
    ///
    /// Environment variable: `DELIVERY_TIMEOUT_SECONDS`
    #[serde(default, alias = "DELIVERY_TIMEOUT_SECONDS")]
    pub delivery_timeout_seconds: Option<u64>,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// # Errors
    ///
    /// Fails if a source holds a value of the wrong type or the merged
    /// configuration does not pass validation.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the static route table from the configured destinations.
    ///
    /// One entry is considered per table in [`ROUTED_TABLES`].
    pub fn route_table(&self) -> RouteTable {
        ROUTED_TABLES
            .into_iter()
            .map(|(table, variable)| (table, self.webhook_url(variable)))
            .collect()
    }

    /// Returns the destination held by the setting named `variable`.
    pub fn webhook_url(&self, variable: &str) -> Option<&str> {
        match variable {
            "RECRUITS_WEBHOOK_URL" => self.recruits_webhook_url.as_deref(),
            "PORTAL_WEBHOOK_URL" => self.portal_webhook_url.as_deref(),
            _ => None,
        }
    }

    /// Convert to the delivery client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: self.delivery_timeout_seconds.map(Duration::from_secs),
            user_agent: default_user_agent(),
        }
    }

    /// Parse server socket address from host and port configuration.
    ///
    /// # Errors
    ///
    /// Fails if `host:port` is not a valid socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.delivery_timeout_seconds == Some(0) {
            anyhow::bail!("delivery_timeout_seconds must be greater than 0 when set");
        }

        for (table, url) in self.route_table().iter() {
            let parsed = Url::parse(url)
                .with_context(|| format!("invalid webhook URL configured for table {table}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("webhook URL for table {table} must use http or https");
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            recruits_webhook_url: None,
            portal_webhook_url: None,
            delivery_timeout_seconds: None,
            rust_log: default_log_level(),
        }
    }
}

/// Reduces a destination URL to scheme and host for logging.
///
/// Webhook URLs often embed tokens in the path or query, so only the origin
/// is safe to log.
pub fn destination_masked(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}/***", parsed.scheme(), host),
            None => "***".to_string(),
        },
        Err(_) => "***".to_string(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}
