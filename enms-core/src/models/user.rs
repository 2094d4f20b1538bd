use serde::{Deserialize, Serialize};

/// Account allowed to use the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: String::new(),
            password: password.into(),
        }
    }
}
