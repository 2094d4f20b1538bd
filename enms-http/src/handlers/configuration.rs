use crate::error::AppError;
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};

/// Get configuration
///
/// Returns the most recent configuration stored for a device.
/// Requires authentication.
#[utoipa::path(
    get,
    path = "/rest/configuration/{name}",
    responses(
        (status = 200, description = "Latest configuration", body = String),
        (status = 403, description = "Unauthorized access"),
        (status = 404, description = "Device or configuration not found")
    ),
    params(
        ("name" = String, Path, description = "Device name")
    )
)]
#[axum::debug_handler]
pub async fn get_configuration(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<String>, AppError> {
    let device = state.database.device(&name)?;
    device
        .latest_configuration()
        .map(|configuration| Json(configuration.to_string()))
        .ok_or_else(|| AppError::NotFound(format!("No configuration stored for {}", name)))
}
