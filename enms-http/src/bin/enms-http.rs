use anyhow::Context;
use clap::Parser;
use enms_core::config::EnmsConfig;
use enms_http::{self, server::ServerConfig};
use std::path::PathBuf;

/// eNMS HTTP API Server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cluster id reported by the heartbeat
    #[arg(long, env = "CLUSTER_ID")]
    cluster_id: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut enms_config = match &cli.config {
        Some(file) => EnmsConfig::from_file(file)
            .with_context(|| format!("Loading configuration from {}", file.display()))?,
        None => EnmsConfig::default(),
    };
    if let Some(cluster_id) = cli.cluster_id {
        enms_config.cluster_id = cluster_id;
    }

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        enms_config,
    };

    enms_http::start_with_config(config, &cli.log_level).await
}
