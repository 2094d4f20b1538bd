//! Inventory and automation models

pub mod device;
pub mod job;
pub mod link;
pub mod pool;
pub mod user;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

pub use device::Device;
pub use job::Job;
pub use link::Link;
pub use pool::Pool;
pub use user::User;

/// Model classes reachable through the instance API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ModelClass {
    Device,
    Link,
    Pool,
    User,
    Job,
}

/// A stored instance of any model class.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    Device(Device),
    Link(Link),
    Pool(Pool),
    User(User),
    Job(Job),
}

impl Instance {
    pub fn class(&self) -> ModelClass {
        match self {
            Self::Device(_) => ModelClass::Device,
            Self::Link(_) => ModelClass::Link,
            Self::Pool(_) => ModelClass::Pool,
            Self::User(_) => ModelClass::User,
            Self::Job(_) => ModelClass::Job,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Self::Device(device) => device.id,
            Self::Link(link) => link.id,
            Self::Pool(pool) => pool.id,
            Self::User(user) => user.id,
            Self::Job(job) => job.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Device(device) => &device.name,
            Self::Link(link) => &link.name,
            Self::Pool(pool) => &pool.name,
            Self::User(user) => &user.name,
            Self::Job(job) => &job.name,
        }
    }

    /// JSON representation returned by the API.
    pub fn serialized(&self) -> Value {
        let value = match self {
            Self::Device(device) => serde_json::to_value(device),
            Self::Link(link) => serde_json::to_value(link),
            Self::Pool(pool) => serde_json::to_value(pool),
            Self::User(user) => serde_json::to_value(user),
            Self::Job(job) => serde_json::to_value(job),
        };
        // Models only hold string-keyed maps and plain values.
        value.unwrap_or(Value::Null)
    }

    /// Build an instance of `class` from its JSON representation.
    pub fn from_value(class: ModelClass, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match class {
            ModelClass::Device => Self::Device(serde_json::from_value(value)?),
            ModelClass::Link => Self::Link(serde_json::from_value(value)?),
            ModelClass::Pool => Self::Pool(serde_json::from_value(value)?),
            ModelClass::User => Self::User(serde_json::from_value(value)?),
            ModelClass::Job => Self::Job(serde_json::from_value(value)?),
        })
    }
}

impl From<Device> for Instance {
    fn from(device: Device) -> Self {
        Self::Device(device)
    }
}

impl From<Link> for Instance {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

impl From<Pool> for Instance {
    fn from(pool: Pool) -> Self {
        Self::Pool(pool)
    }
}

impl From<User> for Instance {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Job> for Instance {
    fn from(job: Job) -> Self {
        Self::Job(job)
    }
}
