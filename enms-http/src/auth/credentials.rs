use axum::http::{HeaderMap, header::AUTHORIZATION};
use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CredentialsError {
    #[error("Authorization scheme is not Basic")]
    Scheme,
    #[error("Invalid base64 credentials: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Credentials are not valid UTF-8")]
    Utf8,
    #[error("Credentials lack the username separator")]
    Separator,
}

/// HTTP Basic credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Parse the value of an `Authorization` header.
    pub fn parse(value: &str) -> Result<Self, CredentialsError> {
        let (scheme, encoded) = value.trim().split_once(' ').ok_or(CredentialsError::Scheme)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(CredentialsError::Scheme);
        }
        let decoded = STANDARD.decode(encoded.trim())?;
        let decoded = String::from_utf8(decoded).map_err(|_| CredentialsError::Utf8)?;
        let (username, password) = decoded.split_once(':').ok_or(CredentialsError::Separator)?;
        Ok(Self::new(username, password))
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        Self::parse(value).ok()
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Value of the `Authorization` header carrying these credentials.
    pub fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            self.username,
            self.password.expose_secret()
        ));
        format!("Basic {}", encoded)
    }
}
