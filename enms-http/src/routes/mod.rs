pub mod rest;
pub mod swagger;

use crate::server::AppState;
use axum::Router;
use swagger::ApiDoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main API router with state
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(
            SwaggerUi::new("/rest/swagger-ui").url("/rest/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .nest("/rest", rest::routes())
}
