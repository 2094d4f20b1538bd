use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Heartbeat response model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HeartbeatResponse {
    /// Node identifier
    pub name: u64,

    /// Cluster the node belongs to
    pub cluster_id: u32,

    /// Current CPU load in percent
    pub cpu_load: f32,
}
