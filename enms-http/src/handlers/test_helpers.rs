use std::sync::Arc;

use crate::auth::Credentials;
use crate::server::{AppState, build_state};
use enms_core::{
    automation::{JobRunner, LoggingRunner},
    config::EnmsConfig,
    models::{Device, Job, Pool},
};

/// Create a test AppState for testing
///
/// The state holds the `admin`/`admin` user, devices `r1` to `r3`, the pool
/// `core` with `r2` and `r3` and the job `backup`.
pub fn create_test_state() -> AppState {
    create_test_state_with_runner(Arc::new(LoggingRunner))
}

/// Create a test AppState running jobs with `runner`
pub fn create_test_state_with_runner(runner: Arc<dyn JobRunner>) -> AppState {
    let config = EnmsConfig {
        node_id: Some(0x0100_0000_0001),
        cluster_id: 7,
        ..Default::default()
    };
    let state = build_state(config, runner);
    seed_inventory(&state);
    state
}

/// Create a test AppState storing migrations and projects under `root`
pub fn create_test_state_in(root: &std::path::Path) -> AppState {
    let config = EnmsConfig {
        migration_path: root.join("migrations"),
        project_path: root.join("projects"),
        ..Default::default()
    };
    let state = build_state(config, Arc::new(LoggingRunner));
    seed_inventory(&state);
    state
}

fn seed_inventory(state: &AppState) {
    let database = &state.database;
    for (name, ip_address) in [("r1", "10.0.0.1"), ("r2", "10.0.0.2"), ("r3", "10.0.0.3")] {
        database.save(Device::new(name, ip_address));
    }
    let mut pool = Pool::new("core");
    pool.devices = vec!["r2".to_string(), "r3".to_string()];
    database.save(pool);
    database.save(Job::new("backup"));
}

/// `Authorization` header value for the given credentials
pub fn basic_auth(username: &str, password: &str) -> String {
    Credentials::new(username, password).header_value()
}
