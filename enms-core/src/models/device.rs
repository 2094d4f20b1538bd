use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_port() -> u16 {
    22
}

/// Network device of the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub enable_password: String,
    /// Configuration snapshots keyed by retrieval time.
    #[serde(default)]
    pub configurations: BTreeMap<DateTime<Utc>, String>,
}

impl Device {
    pub fn new(name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            subtype: String::new(),
            vendor: String::new(),
            model: String::new(),
            location: String::new(),
            operating_system: String::new(),
            os_version: String::new(),
            ip_address: ip_address.into(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            enable_password: String::new(),
            configurations: BTreeMap::new(),
        }
    }

    /// Most recent configuration snapshot.
    pub fn latest_configuration(&self) -> Option<&str> {
        self.configurations
            .last_key_value()
            .map(|(_, configuration)| configuration.as_str())
    }

    /// Value of a property as matched by pool criteria.
    pub fn property(&self, property: &str) -> Option<String> {
        let value = match property {
            "name" => &self.name,
            "description" => &self.description,
            "subtype" => &self.subtype,
            "vendor" => &self.vendor,
            "model" => &self.model,
            "location" => &self.location,
            "operating_system" => &self.operating_system,
            "os_version" => &self.os_version,
            "ip_address" => &self.ip_address,
            "port" => return Some(self.port.to_string()),
            _ => return None,
        };
        Some(value.clone())
    }
}
