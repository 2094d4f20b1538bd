use super::unknown_direction;
use crate::error::AppError;
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use enms_core::admin::{MigrationRequest, migrate_export, migrate_import};

/// Migrate
///
/// Exports the selected model classes to, or imports them from, the
/// migration directory named in the body.
/// Requires authentication.
#[utoipa::path(
    post,
    path = "/rest/migrate/{direction}",
    responses(
        (status = 200, description = "Migration result", body = String),
        (status = 400, description = "Unknown direction or invalid migration file"),
        (status = 403, description = "Unauthorized access"),
        (status = 500, description = "Migration files could not be accessed")
    ),
    params(
        ("direction" = String, Path, description = "import or export")
    )
)]
#[axum::debug_handler]
pub async fn migrate(
    State(state): State<AppState>,
    Path(direction): Path<String>,
    Json(request): Json<MigrationRequest>,
) -> Result<Json<String>, AppError> {
    let migration_path = &state.config.migration_path;
    let result = match direction.as_str() {
        "import" => migrate_import(&state.database, migration_path, &request).await?,
        "export" => migrate_export(&state.database, migration_path, &request).await?,
        other => return Err(unknown_direction(other)),
    };
    Ok(Json(result))
}
