//! In-memory persistence for the inventory and automation models

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::models::{Device, Instance, Job, ModelClass, Pool, User};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("{class} not found: {key}")]
    NotFound { class: ModelClass, key: String },
    #[error("Unknown model class: {0}")]
    UnknownClass(String),
    #[error("A name is required to create a {0}")]
    MissingName(ModelClass),
    #[error("Invalid {class} data: {source}")]
    Invalid {
        class: ModelClass,
        source: serde_json::Error,
    },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Resolve a model class from its name, e.g. `Device`.
pub fn model_class(name: &str) -> DatabaseResult<ModelClass> {
    name.parse()
        .map_err(|_| DatabaseError::UnknownClass(name.to_string()))
}

fn not_found(class: ModelClass, key: impl Into<String>) -> DatabaseError {
    DatabaseError::NotFound {
        class,
        key: key.into(),
    }
}

/// Instances keyed by class and name.
#[derive(Clone, Debug, Default)]
pub struct Database {
    instances: Arc<DashMap<(ModelClass, String), Instance>>,
    next_id: Arc<AtomicU64>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn fetch(&self, class: ModelClass, name: &str) -> DatabaseResult<Instance> {
        self.instances
            .get(&(class, name.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_found(class, name))
    }

    pub fn fetch_by_id(&self, class: ModelClass, id: u64) -> DatabaseResult<Instance> {
        self.instances
            .iter()
            .find(|entry| entry.key().0 == class && entry.value().id() == id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_found(class, id.to_string()))
    }

    /// Every instance of a class, ordered by id.
    pub fn fetch_all(&self, class: ModelClass) -> Vec<Instance> {
        let mut instances: Vec<Instance> = self
            .instances
            .iter()
            .filter(|entry| entry.key().0 == class)
            .map(|entry| entry.value().clone())
            .collect();
        instances.sort_by_key(Instance::id);
        instances
    }

    pub fn device(&self, name: &str) -> DatabaseResult<Device> {
        match self.fetch(ModelClass::Device, name)? {
            Instance::Device(device) => Ok(device),
            _ => Err(not_found(ModelClass::Device, name)),
        }
    }

    pub fn device_by_id(&self, id: u64) -> DatabaseResult<Device> {
        match self.fetch_by_id(ModelClass::Device, id)? {
            Instance::Device(device) => Ok(device),
            _ => Err(not_found(ModelClass::Device, id.to_string())),
        }
    }

    pub fn device_by_ip(&self, ip_address: &str) -> DatabaseResult<Device> {
        self.instances
            .iter()
            .find_map(|entry| match entry.value() {
                Instance::Device(device) if device.ip_address == ip_address => Some(device.clone()),
                _ => None,
            })
            .ok_or_else(|| not_found(ModelClass::Device, ip_address))
    }

    pub fn devices(&self) -> Vec<Device> {
        self.fetch_all(ModelClass::Device)
            .into_iter()
            .filter_map(|instance| match instance {
                Instance::Device(device) => Some(device),
                _ => None,
            })
            .collect()
    }

    pub fn pool(&self, name: &str) -> DatabaseResult<Pool> {
        match self.fetch(ModelClass::Pool, name)? {
            Instance::Pool(pool) => Ok(pool),
            _ => Err(not_found(ModelClass::Pool, name)),
        }
    }

    pub fn pools(&self) -> Vec<Pool> {
        self.fetch_all(ModelClass::Pool)
            .into_iter()
            .filter_map(|instance| match instance {
                Instance::Pool(pool) => Some(pool),
                _ => None,
            })
            .collect()
    }

    /// Member devices of a pool.
    pub fn pool_devices(&self, pool: &Pool) -> DatabaseResult<Vec<Device>> {
        pool.devices.iter().map(|name| self.device(name)).collect()
    }

    pub fn job(&self, name: &str) -> DatabaseResult<Job> {
        match self.fetch(ModelClass::Job, name)? {
            Instance::Job(job) => Ok(job),
            _ => Err(not_found(ModelClass::Job, name)),
        }
    }

    pub fn job_by_id(&self, id: u64) -> DatabaseResult<Job> {
        match self.fetch_by_id(ModelClass::Job, id)? {
            Instance::Job(job) => Ok(job),
            _ => Err(not_found(ModelClass::Job, id.to_string())),
        }
    }

    /// Apply `update` to a stored job while holding its entry.
    pub fn update_job<R>(&self, name: &str, update: impl FnOnce(&mut Job) -> R) -> DatabaseResult<R> {
        let mut entry = self
            .instances
            .get_mut(&(ModelClass::Job, name.to_string()))
            .ok_or_else(|| not_found(ModelClass::Job, name))?;
        match entry.value_mut() {
            Instance::Job(job) => Ok(update(job)),
            _ => Err(not_found(ModelClass::Job, name)),
        }
    }

    pub fn user(&self, name: &str) -> Option<User> {
        match self.fetch(ModelClass::User, name).ok()? {
            Instance::User(user) => Some(user),
            _ => None,
        }
    }

    /// Create or update an instance from its fields, keyed by `name`.
    ///
    /// Fields of an existing instance that are not submitted keep their value.
    /// The `id` of an instance is never taken from the submitted fields.
    pub fn factory(&self, class: ModelClass, mut fields: Map<String, Value>) -> DatabaseResult<Instance> {
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .ok_or(DatabaseError::MissingName(class))?
            .to_string();
        fields.remove("id");
        self.check_references(class, &fields)?;

        let invalid = |source| DatabaseError::Invalid { class, source };
        match self.instances.entry((class, name)) {
            Entry::Occupied(mut entry) => {
                let mut merged = match entry.get().serialized() {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                merged.extend(fields);
                let instance = Instance::from_value(class, Value::Object(merged)).map_err(invalid)?;
                debug!(%class, name = instance.name(), "updated instance");
                entry.insert(instance.clone());
                Ok(instance)
            }
            Entry::Vacant(entry) => {
                fields.insert("id".to_string(), Value::from(self.allocate_id()));
                let instance = Instance::from_value(class, Value::Object(fields)).map_err(invalid)?;
                debug!(%class, name = instance.name(), "created instance");
                entry.insert(instance.clone());
                Ok(instance)
            }
        }
    }

    /// Reject submitted references to devices or pools that do not exist.
    fn check_references(&self, class: ModelClass, fields: &Map<String, Value>) -> DatabaseResult<()> {
        let references: &[(&str, ModelClass)] = match class {
            ModelClass::Pool => &[("devices", ModelClass::Device)],
            ModelClass::Job => &[("devices", ModelClass::Device), ("pools", ModelClass::Pool)],
            _ => &[],
        };
        for (property, target) in references {
            let Some(Value::Array(names)) = fields.get(*property) else {
                continue;
            };
            for name in names.iter().filter_map(Value::as_str) {
                if !self.instances.contains_key(&(*target, name.to_string())) {
                    return Err(not_found(*target, name));
                }
            }
        }
        Ok(())
    }

    /// Remove deleted devices or pools from the pools and jobs referencing them.
    fn detach(&self, class: ModelClass, names: &[String]) {
        if names.is_empty() || !matches!(class, ModelClass::Device | ModelClass::Pool) {
            return;
        }
        for mut entry in self.instances.iter_mut() {
            match (class, entry.value_mut()) {
                (ModelClass::Device, Instance::Pool(pool)) => {
                    pool.devices.retain(|name| !names.contains(name))
                }
                (ModelClass::Device, Instance::Job(job)) => {
                    job.devices.retain(|name| !names.contains(name))
                }
                (ModelClass::Pool, Instance::Job(job)) => {
                    job.pools.retain(|name| !names.contains(name))
                }
                _ => {}
            }
        }
    }

    /// Store an instance as is, allocating an id to new instances.
    pub fn save(&self, instance: impl Into<Instance>) -> Instance {
        let mut instance = instance.into();
        if instance.id() == 0 {
            let id = self.allocate_id();
            match &mut instance {
                Instance::Device(device) => device.id = id,
                Instance::Link(link) => link.id = id,
                Instance::Pool(pool) => pool.id = id,
                Instance::User(user) => user.id = id,
                Instance::Job(job) => job.id = id,
            }
        }
        self.instances.insert(
            (instance.class(), instance.name().to_string()),
            instance.clone(),
        );
        instance
    }

    /// Delete an instance and return its serialized form.
    pub fn delete(&self, class: ModelClass, name: &str) -> DatabaseResult<Value> {
        let (_, instance) = self
            .instances
            .remove(&(class, name.to_string()))
            .ok_or_else(|| not_found(class, name))?;
        self.detach(class, &[name.to_string()]);
        debug!(%class, name, "deleted instance");
        Ok(instance.serialized())
    }

    /// Delete every instance of a class, returning how many were removed.
    pub fn delete_all(&self, class: ModelClass) -> usize {
        let mut removed = Vec::new();
        self.instances.retain(|key, _| {
            if key.0 == class {
                removed.push(key.1.clone());
                false
            } else {
                true
            }
        });
        self.detach(class, &removed);
        removed.len()
    }
}
