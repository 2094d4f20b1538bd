//! Migration of database contents to and from JSON files
//!
//! A migration named `name` is stored under `<migration_path>/<name>/`, one
//! `<Class>.json` file per model class holding an array of serialized
//! instances.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::info;

use crate::config::is_plain_name;
use crate::database::{Database, DatabaseError};
use crate::models::ModelClass;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid migration file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid migration name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type MigrationResult<T> = Result<T, MigrationError>;

fn all_classes() -> Vec<ModelClass> {
    ModelClass::iter().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub name: String,
    #[serde(default = "all_classes")]
    pub import_export_types: Vec<ModelClass>,
    #[serde(default)]
    pub empty_database_before_import: bool,
}

fn class_file(migration_path: &Path, name: &str, class: ModelClass) -> PathBuf {
    migration_path.join(name).join(format!("{}.json", class))
}

fn check_name(request: &MigrationRequest) -> MigrationResult<()> {
    if is_plain_name(&request.name) {
        Ok(())
    } else {
        Err(MigrationError::InvalidName(request.name.clone()))
    }
}

/// Classes in the order instances must be created for references to resolve.
fn import_order(classes: &[ModelClass]) -> Vec<ModelClass> {
    let mut classes = classes.to_vec();
    classes.sort();
    classes.dedup();
    classes
}

pub async fn migrate_export(
    database: &Database,
    migration_path: &Path,
    request: &MigrationRequest,
) -> MigrationResult<String> {
    check_name(request)?;
    let directory = migration_path.join(&request.name);
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|source| MigrationError::Io {
            path: directory.clone(),
            source,
        })?;
    for class in import_order(&request.import_export_types) {
        let path = class_file(migration_path, &request.name, class);
        let instances: Vec<Value> = database
            .fetch_all(class)
            .iter()
            .map(|instance| instance.serialized())
            .collect();
        let content = serde_json::to_vec_pretty(&instances).map_err(|source| MigrationError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| MigrationError::Io { path, source })?;
        info!(%class, count = instances.len(), "exported instances");
    }
    Ok("Export successful.".to_string())
}

pub async fn migrate_import(
    database: &Database,
    migration_path: &Path,
    request: &MigrationRequest,
) -> MigrationResult<String> {
    check_name(request)?;
    let classes = import_order(&request.import_export_types);
    if request.empty_database_before_import {
        for class in &classes {
            let removed = database.delete_all(*class);
            info!(%class, removed, "emptied class before import");
        }
    }
    for class in classes {
        let path = class_file(migration_path, &request.name, class);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|source| MigrationError::Io {
                path: path.clone(),
                source,
            })?;
        let instances: Vec<serde_json::Map<String, Value>> =
            serde_json::from_slice(&content).map_err(|source| MigrationError::Json {
                path: path.clone(),
                source,
            })?;
        let count = instances.len();
        for fields in instances {
            database.factory(class, fields)?;
        }
        info!(%class, count, "imported instances");
    }
    Ok("Import successful.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, Pool};
    use serde_json::json;

    fn request(name: &str, empty: bool) -> MigrationRequest {
        serde_json::from_value(json!({
            "name": name,
            "import_export_types": ["Pool", "Device"],
            "empty_database_before_import": empty,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_export_then_import_into_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let source = Database::new();
        source.save(Device::new("r1", "10.0.0.1"));
        let mut pool = Pool::new("core");
        pool.devices = vec!["r1".to_string()];
        source.save(pool);

        let message = migrate_export(&source, dir.path(), &request("backup", false))
            .await
            .unwrap();
        assert_eq!(message, "Export successful.");
        assert!(dir.path().join("backup").join("Device.json").exists());
        assert!(!dir.path().join("backup").join("Job.json").exists());

        let target = Database::new();
        let message = migrate_import(&target, dir.path(), &request("backup", false))
            .await
            .unwrap();
        assert_eq!(message, "Import successful.");
        assert_eq!(target.device("r1").unwrap().ip_address, "10.0.0.1");
        assert_eq!(target.pool("core").unwrap().devices, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_import_can_empty_the_database_first() {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::new();
        database.save(Device::new("r1", "10.0.0.1"));
        migrate_export(&database, dir.path(), &request("snapshot", false))
            .await
            .unwrap();

        database.save(Device::new("r2", "10.0.0.2"));
        migrate_import(&database, dir.path(), &request("snapshot", true))
            .await
            .unwrap();
        let names: Vec<String> = database.devices().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_import_of_missing_migration_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = migrate_import(&Database::new(), dir.path(), &request("missing", false))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Io { .. }));
    }

    #[tokio::test]
    async fn test_names_leaving_the_migration_path_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let migration_path = dir.path().join("migrations");
        let database = Database::new();
        database.save(Device::new("r1", "10.0.0.1"));

        let absolute = outside.path().join("escaped");
        for name in [absolute.to_str().unwrap(), "../escaped", ".."] {
            let err = migrate_export(&database, &migration_path, &request(name, false))
                .await
                .unwrap_err();
            assert!(matches!(err, MigrationError::InvalidName(_)));
            let err = migrate_import(&database, &migration_path, &request(name, true))
                .await
                .unwrap_err();
            assert!(matches!(err, MigrationError::InvalidName(_)));
        }
        assert!(!outside.path().join("escaped").exists());
        assert!(!dir.path().join("escaped").exists());
        assert!(database.device("r1").is_ok());
    }

    #[test]
    fn test_request_defaults_to_every_class() {
        let request: MigrationRequest = serde_json::from_value(json!({"name": "all"})).unwrap();
        assert_eq!(request.import_export_types.len(), 5);
        assert!(!request.empty_database_before_import);
    }
}
