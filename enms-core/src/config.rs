use std::{
    fs::File,
    io::BufReader,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnmsConfig {
    #[serde(default = "default_cluster_id")]
    pub cluster_id: u32,

    /// Node id reported by the heartbeat; generated at startup when unset.
    #[serde(default)]
    pub node_id: Option<u64>,

    #[serde(default = "default_migration_path")]
    pub migration_path: PathBuf,

    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,

    /// Password of the `admin` account created at startup.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for EnmsConfig {
    fn default() -> Self {
        Self {
            cluster_id: default_cluster_id(),
            node_id: None,
            migration_path: default_migration_path(),
            project_path: default_project_path(),
            admin_password: default_admin_password(),
        }
    }
}

impl EnmsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Whether `name` can be joined onto a configured directory without leaving it.
///
/// Only a single plain path component is accepted.
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn default_cluster_id() -> u32 {
    1
}

fn default_migration_path() -> PathBuf {
    PathBuf::from("projects").join("migrations")
}

fn default_project_path() -> PathBuf {
    PathBuf::from("projects")
}

fn default_admin_password() -> String {
    "admin".to_string()
}
