use super::unauthorized;
use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use enms_core::models::User;

/// Extractor for the authenticated user
///
/// This extractor gets the authenticated user from the request extensions
/// without consuming the request body.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Get a reference to the inner user
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or_else(unauthorized)?
            .clone();

        Ok(AuthUser(user))
    }
}
