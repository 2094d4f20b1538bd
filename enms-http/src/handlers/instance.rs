use crate::auth::AuthUser;
use crate::error::AppError;
use crate::server::AppState;
use axum::{
    extract::{Form, Path, State},
    response::Json,
};
use enms_core::{
    database::model_class,
    forms::{FormData, postprocess},
};
use serde_json::{Map, Value};
use tracing::debug;

/// Get instance
///
/// Returns the serialized instance of a model class by name.
/// Requires authentication.
#[utoipa::path(
    get,
    path = "/rest/instance/{cls}/{name}",
    responses(
        (status = 200, description = "Serialized instance"),
        (status = 400, description = "Unknown model class"),
        (status = 403, description = "Unauthorized access"),
        (status = 404, description = "Instance not found")
    ),
    params(
        ("cls" = String, Path, description = "Model class, e.g. Device"),
        ("name" = String, Path, description = "Instance name")
    )
)]
#[axum::debug_handler]
pub async fn get_instance(
    State(state): State<AppState>,
    Path((cls, name)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let class = model_class(&cls)?;
    Ok(Json(state.database.fetch(class, &name)?.serialized()))
}

/// Delete instance
#[utoipa::path(
    delete,
    path = "/rest/instance/{cls}/{name}",
    responses(
        (status = 200, description = "Serialized form of the deleted instance"),
        (status = 400, description = "Unknown model class"),
        (status = 403, description = "Unauthorized access"),
        (status = 404, description = "Instance not found")
    ),
    params(
        ("cls" = String, Path, description = "Model class, e.g. Device"),
        ("name" = String, Path, description = "Instance name")
    )
)]
#[axum::debug_handler]
pub async fn delete_instance(
    State(state): State<AppState>,
    Path((cls, name)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let class = model_class(&cls)?;
    Ok(Json(state.database.delete(class, &name)?))
}

/// Create or update instance
///
/// The JSON body holds the instance fields; `name` selects the instance.
#[utoipa::path(
    post,
    path = "/rest/instance/{cls}",
    responses(
        (status = 200, description = "Serialized instance"),
        (status = 400, description = "Unknown model class or invalid fields"),
        (status = 403, description = "Unauthorized access")
    ),
    params(
        ("cls" = String, Path, description = "Model class, e.g. Device")
    )
)]
#[axum::debug_handler]
pub async fn update_instance(
    State(state): State<AppState>,
    Path(cls): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Value>, AppError> {
    let class = model_class(&cls)?;
    Ok(Json(state.database.factory(class, fields)?.serialized()))
}

/// Create or update instance from a form
///
/// The url-encoded body is converted according to its `form_type` before
/// the instance is created or updated.
#[utoipa::path(
    post,
    path = "/rest/update/{cls}",
    responses(
        (status = 200, description = "Serialized instance"),
        (status = 400, description = "Unknown model class or invalid form value"),
        (status = 403, description = "Unauthorized access")
    ),
    params(
        ("cls" = String, Path, description = "Model class, e.g. Device")
    )
)]
#[axum::debug_handler]
pub async fn update_from_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cls): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    let class = model_class(&cls)?;
    let form: FormData = pairs.into_iter().collect();
    debug!(%class, form_type = ?form.form_type(), "processing form");
    let processed = postprocess(&state.forms, &form, &auth.user().name, None)?;
    Ok(Json(state.database.factory(class, processed.data)?.serialized()))
}
