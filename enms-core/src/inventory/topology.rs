//! Topology import and export
//!
//! A topology file is a JSON workbook with one sheet of rows per object type:
//! `{"Device": [{...}], "Link": [{...}]}`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::is_plain_name;
use crate::database::{Database, DatabaseError};
use crate::models::{Instance, ModelClass};

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Invalid topology file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid topology name: {0}")]
    InvalidName(String),
    #[error("Invalid criteria for pool {pool}: {source}")]
    Criteria { pool: String, source: regex::Error },
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type TopologyResult<T> = Result<T, TopologyError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "Device", default)]
    pub devices: Vec<Map<String, Value>>,
    #[serde(rename = "Link", default)]
    pub links: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Delete every device and link before importing.
    pub replace: bool,
    /// Recompute pool memberships after importing.
    pub update_pools: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub name: String,
}

/// Recompute every pool that is not marked `never_update`.
pub fn update_pools(database: &Database) -> TopologyResult<usize> {
    let devices = database.devices();
    let mut updated = 0;
    for mut pool in database.pools() {
        if pool.never_update {
            continue;
        }
        pool.compute(&devices)
            .map_err(|source| TopologyError::Criteria {
                pool: pool.name.clone(),
                source,
            })?;
        database.save(pool);
        updated += 1;
    }
    Ok(updated)
}

pub fn object_import(database: &Database, options: ImportOptions, content: &[u8]) -> TopologyResult<String> {
    let topology: Topology = serde_json::from_slice(content)?;
    if options.replace {
        let devices = database.delete_all(ModelClass::Device);
        let links = database.delete_all(ModelClass::Link);
        info!(devices, links, "deleted topology before import");
    }
    for row in topology.devices {
        database.factory(ModelClass::Device, row)?;
    }
    for row in topology.links {
        let Instance::Link(link) = database.factory(ModelClass::Link, row)? else {
            continue;
        };
        for endpoint in [&link.source, &link.destination] {
            if database.device(endpoint).is_err() {
                warn!(link = %link.name, device = %endpoint, "link endpoint not in inventory");
            }
        }
    }
    if options.update_pools {
        let updated = update_pools(database)?;
        info!(updated, "updated pools after import");
    }
    Ok("Topology successfully imported.".to_string())
}

pub async fn object_export(
    database: &Database,
    options: &ExportOptions,
    project_path: &Path,
) -> TopologyResult<String> {
    if !is_plain_name(&options.name) {
        return Err(TopologyError::InvalidName(options.name.clone()));
    }
    let serialized = |class: ModelClass| -> Vec<Map<String, Value>> {
        database
            .fetch_all(class)
            .iter()
            .filter_map(|instance| match instance.serialized() {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    };
    let topology = Topology {
        devices: serialized(ModelClass::Device),
        links: serialized(ModelClass::Link),
    };
    let directory = project_path.join("objects");
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|source| TopologyError::Io {
            path: directory.clone(),
            source,
        })?;
    let path = directory.join(format!("{}.json", options.name));
    tokio::fs::write(&path, serde_json::to_vec_pretty(&topology)?)
        .await
        .map_err(|source| TopologyError::Io { path, source })?;
    info!(name = %options.name, "exported topology");
    Ok("Topology successfully exported.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, Pool};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn workbook() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "Device": [
                {"name": "paris-r1", "ip_address": "10.0.0.1", "vendor": "Cisco"},
                {"name": "paris-r2", "ip_address": "10.0.0.2", "vendor": "Juniper"},
            ],
            "Link": [
                {"name": "paris-r1-r2", "source": "paris-r1", "destination": "paris-r2"},
            ],
        }))
        .unwrap()
    }

    #[test]
    fn test_import_creates_objects() {
        let database = Database::new();
        let message = object_import(&database, ImportOptions::default(), &workbook()).unwrap();
        assert_eq!(message, "Topology successfully imported.");
        assert_eq!(database.devices().len(), 2);
        assert_eq!(database.fetch_all(ModelClass::Link).len(), 1);
    }

    #[test]
    fn test_replace_deletes_existing_devices() {
        let database = Database::new();
        database.save(Device::new("old", "192.168.0.1"));
        let options = ImportOptions {
            replace: true,
            update_pools: false,
        };
        object_import(&database, options, &workbook()).unwrap();
        assert!(database.device("old").is_err());
        assert!(database.device("paris-r1").is_ok());
    }

    #[test]
    fn test_update_pools_after_import() {
        let database = Database::new();
        let mut cisco = Pool::new("cisco");
        cisco.criteria.insert("vendor".to_string(), "^Cisco$".to_string());
        database.save(cisco);
        let mut frozen = Pool::new("frozen");
        frozen.criteria.insert("vendor".to_string(), "Juniper".to_string());
        frozen.never_update = true;
        database.save(frozen);

        let options = ImportOptions {
            replace: false,
            update_pools: true,
        };
        object_import(&database, options, &workbook()).unwrap();
        assert_eq!(database.pool("cisco").unwrap().devices, vec!["paris-r1".to_string()]);
        assert!(database.pool("frozen").unwrap().devices.is_empty());
    }

    #[test]
    fn test_invalid_workbook() {
        let err = object_import(&Database::new(), ImportOptions::default(), b"not json").unwrap_err();
        assert!(matches!(err, TopologyError::Parse(_)));
    }

    #[tokio::test]
    async fn test_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::new();
        object_import(&database, ImportOptions::default(), &workbook()).unwrap();

        let options = ExportOptions {
            name: "site".to_string(),
        };
        let message = object_export(&database, &options, dir.path()).await.unwrap();
        assert_eq!(message, "Topology successfully exported.");

        let content = std::fs::read(dir.path().join("objects").join("site.json")).unwrap();
        let topology: Topology = serde_json::from_slice(&content).unwrap();
        assert_eq!(topology.devices.len(), 2);
        assert_eq!(topology.links[0]["source"], json!("paris-r1"));
    }

    #[tokio::test]
    async fn test_export_rejects_names_leaving_the_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project");
        for name in ["../../escaped", "/tmp/escaped", "a/b"] {
            let options = ExportOptions {
                name: name.to_string(),
            };
            let err = object_export(&Database::new(), &options, &project).await.unwrap_err();
            assert!(matches!(err, TopologyError::InvalidName(n) if n == name));
        }
        assert!(!project.exists());
    }
}
