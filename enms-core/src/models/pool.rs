use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Device;

/// Named group of devices.
///
/// Membership is either given explicitly in `devices` or computed from
/// `criteria`, a map of device property to regular expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: BTreeMap<String, String>,
    /// Names of the member devices.
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub never_update: bool,
}

impl Pool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            criteria: BTreeMap::new(),
            devices: Vec::new(),
            never_update: false,
        }
    }

    /// Whether a device matches every criterion of the pool.
    pub fn matches(&self, device: &Device) -> Result<bool, regex::Error> {
        for (property, pattern) in &self.criteria {
            let regex = Regex::new(pattern)?;
            let value = device.property(property).unwrap_or_default();
            if !regex.is_match(&value) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Recompute membership from the criteria.
    ///
    /// A pool without criteria keeps its explicit members.
    pub fn compute<'a>(
        &mut self,
        devices: impl IntoIterator<Item = &'a Device>,
    ) -> Result<(), regex::Error> {
        if self.criteria.is_empty() {
            return Ok(());
        }
        let mut members = Vec::new();
        for device in devices {
            if self.matches(device)? {
                members.push(device.name.clone());
            }
        }
        members.sort();
        self.devices = members;
        Ok(())
    }
}
