use super::unknown_direction;
use crate::error::AppError;
use crate::server::AppState;
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State, multipart::MultipartError},
    response::Json,
};
use enms_core::inventory::{ExportOptions, ImportOptions, object_export, object_import};
use tracing::debug;

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Read the import options and the uploaded topology file.
async fn read_import_form(mut multipart: Multipart) -> Result<(ImportOptions, Vec<u8>), AppError> {
    let mut options = ImportOptions::default();
    let mut content = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "replace" => options.replace = field.text().await.map_err(multipart_error)? == "True",
            "update_pools" => {
                options.update_pools = field.text().await.map_err(multipart_error)? == "True"
            }
            "file" => content = Some(field.bytes().await.map_err(multipart_error)?.to_vec()),
            other => debug!(field = other, "ignoring form field"),
        }
    }
    let content = content.ok_or_else(|| AppError::BadRequest("Missing file".to_string()))?;
    Ok((options, content))
}

/// Topology
///
/// Import takes a multipart form with the `replace` and `update_pools`
/// flags and a `file` part. Export takes a JSON body `{"name": ...}`.
/// Requires authentication.
#[utoipa::path(
    post,
    path = "/rest/topology/{direction}",
    responses(
        (status = 200, description = "Topology import or export result", body = String),
        (status = 400, description = "Unknown direction or invalid topology"),
        (status = 403, description = "Unauthorized access")
    ),
    params(
        ("direction" = String, Path, description = "import or export")
    )
)]
#[axum::debug_handler]
pub async fn topology(
    State(state): State<AppState>,
    Path(direction): Path<String>,
    request: Request,
) -> Result<Json<String>, AppError> {
    match direction.as_str() {
        "import" => {
            let multipart = Multipart::from_request(request, &state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let (options, content) = read_import_form(multipart).await?;
            Ok(Json(object_import(&state.database, options, &content)?))
        }
        "export" => {
            let Json(options) = Json::<ExportOptions>::from_request(request, &state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let result = object_export(&state.database, &options, &state.config.project_path).await?;
            Ok(Json(result))
        }
        other => Err(unknown_direction(other)),
    }
}
