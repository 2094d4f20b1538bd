use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use enms_core::{
    Database,
    automation::{JobEngine, JobRunner, LoggingRunner, Scheduler},
    config::EnmsConfig,
    forms::{FormRegistry, default_registry},
    models::User,
};
use sysinfo::System;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::auth::{AuthStore, auth_middleware};
use crate::routes::create_api_router;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// eNMS configuration
    pub enms_config: EnmsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enms_config: EnmsConfig::default(),
        }
    }
}

/// Identity and load of the node answering heartbeats
#[derive(Debug)]
pub struct NodeStatus {
    pub node_id: u64,
    system: Mutex<System>,
}

impl NodeStatus {
    pub fn new(node_id: u64) -> Self {
        Self {
            node_id,
            system: Mutex::new(System::new()),
        }
    }

    /// Global CPU usage in percent since the previous call.
    pub async fn cpu_load(&self) -> f32 {
        let mut system = self.system.lock().await;
        system.refresh_cpu_usage();
        system.global_cpu_usage()
    }
}

/// Random 48-bit node id with the multicast bit set, as used when no
/// hardware address is available.
pub fn random_node_id() -> u64 {
    (rand::random::<u64>() & 0xFFFF_FFFF_FFFF) | (1 << 40)
}

/// Shared state of the REST API
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub forms: Arc<FormRegistry>,
    pub engine: JobEngine,
    pub scheduler: Scheduler,
    pub auth_store: AuthStore,
    pub config: Arc<EnmsConfig>,
    pub node: Arc<NodeStatus>,
}

/// Build the application state, seeding the `admin` user.
pub fn build_state(config: EnmsConfig, runner: Arc<dyn JobRunner>) -> AppState {
    let database = Database::new();
    database.save(User::new("admin", config.admin_password.clone()));

    let node_id = config.node_id.unwrap_or_else(random_node_id);
    info!(node_id, cluster_id = config.cluster_id, "Initialized node");

    AppState {
        forms: Arc::new(default_registry()),
        engine: JobEngine::new(database.clone(), runner),
        scheduler: Scheduler::new(),
        auth_store: AuthStore::new(database.clone()),
        config: Arc::new(config),
        node: Arc::new(NodeStatus::new(node_id)),
        database,
    }
}

/// Create the application with authentication, tracing and CORS layers
pub fn create_app(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_api_router()
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.auth_store.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(config.enms_config, Arc::new(LoggingRunner));
    let app = create_app(state.clone());

    // Parse the socket address
    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.scheduler.shutdown();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
