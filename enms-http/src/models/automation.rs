use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Run job request model
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RunJobRequest {
    /// Name of the job to run
    pub name: String,

    /// Payload handed to the job
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: Value,

    /// Schedule the run and return without waiting for its results
    #[serde(default, rename = "async")]
    pub is_async: bool,

    /// Target devices, by name
    #[serde(default)]
    pub devices: Vec<String>,

    /// Target devices, by IP address
    #[serde(default)]
    pub ip_addresses: Vec<String>,

    /// Target pools, whose devices are all targeted
    #[serde(default)]
    pub pools: Vec<String>,
}
