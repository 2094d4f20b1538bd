//! eNMS HTTP API Server
//!
//! This crate serves the eNMS REST API on top of `enms-core`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use server::{ServerConfig, start_server};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing, `RUST_LOG` taking precedence over `default_level`
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer())
        .init();
}

/// Start the eNMS HTTP server with the default configuration
pub async fn start() -> anyhow::Result<()> {
    init_tracing("info");

    start_server(ServerConfig::default()).await
}

/// Start the eNMS HTTP server with a custom configuration
pub async fn start_with_config(config: ServerConfig, log_level: &str) -> anyhow::Result<()> {
    init_tracing(log_level);

    start_server(config).await
}
