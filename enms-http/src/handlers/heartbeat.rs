use crate::models::HeartbeatResponse;
use crate::server::AppState;
use axum::{extract::State, response::Json};

/// Heartbeat
///
/// Reports the node identity and its current CPU load.
/// Does not require authentication.
#[utoipa::path(
    get,
    path = "/rest/is_alive",
    responses(
        (status = 200, description = "Node is alive", body = HeartbeatResponse)
    )
)]
#[axum::debug_handler]
pub async fn is_alive(State(state): State<AppState>) -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse {
        name: state.node.node_id,
        cluster_id: state.config.cluster_id,
        cpu_load: state.node.cpu_load().await,
    })
}
