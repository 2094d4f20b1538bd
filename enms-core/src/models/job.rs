use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_job_type() -> String {
    "service".to_string()
}

/// Automation job (service or workflow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    /// Payload used by runs that do not supply one.
    #[serde(default)]
    pub payload: Value,
    /// Default target devices, by name.
    #[serde(default)]
    pub devices: Vec<String>,
    /// Default target pools, by name.
    #[serde(default)]
    pub pools: Vec<String>,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
    /// Results of past runs keyed by run timestamp.
    #[serde(default)]
    pub logs: BTreeMap<String, Value>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            job_type: default_job_type(),
            payload: Value::Null,
            devices: Vec::new(),
            pools: Vec::new(),
            is_running: false,
            last_run: None,
            logs: BTreeMap::new(),
        }
    }
}
