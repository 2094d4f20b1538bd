use super::{AuthStore, Credentials};
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

/// Response sent for any missing or rejected credentials
pub fn unauthorized() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"message": "Unauthorized access"})),
    )
        .into_response()
}

/// Axum middleware for HTTP basic authentication
pub async fn auth_middleware(
    State(auth_store): State<AuthStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if ignore_auth_path(path) {
        return next.run(request).await;
    }

    let Some(user) = Credentials::from_headers(request.headers())
        .and_then(|credentials| auth_store.authenticate(&credentials))
    else {
        debug!(path = %request.uri().path(), "rejected unauthenticated request");
        return unauthorized();
    };

    // Add user to request extensions
    request.extensions_mut().insert(user);

    next.run(request).await
}

fn ignore_auth_path(path: &str) -> bool {
    is_heartbeat_path(path) || is_swagger_path(path) || is_api_docs_path(path)
}

pub fn is_heartbeat_path(path: &str) -> bool {
    path == "/rest/is_alive"
}

pub fn is_swagger_path(path: &str) -> bool {
    path.starts_with("/rest/swagger-ui")
}

pub fn is_api_docs_path(path: &str) -> bool {
    path.starts_with("/rest/api-docs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_paths() {
        assert!(ignore_auth_path("/rest/is_alive"));
        assert!(ignore_auth_path("/rest/api-docs/openapi.json"));
        assert!(ignore_auth_path("/rest/swagger-ui/index.html"));
        assert!(!ignore_auth_path("/rest/is_alive/extra"));
        assert!(!ignore_auth_path("/rest/run_job"));
    }
}
