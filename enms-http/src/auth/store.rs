use enms_core::{Database, models::User};
use secrecy::ExposeSecret;
use tracing::debug;

use super::Credentials;

/// Checks credentials against the users stored in the database
#[derive(Clone, Debug)]
pub struct AuthStore {
    database: Database,
}

impl AuthStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get the user matching the credentials
    ///
    /// Passwords are compared as stored, without hashing.
    pub fn authenticate(&self, credentials: &Credentials) -> Option<User> {
        let user = self.database.user(&credentials.username)?;
        if user.password == credentials.password().expose_secret() {
            Some(user)
        } else {
            debug!(username = %credentials.username, "password mismatch");
            None
        }
    }
}
