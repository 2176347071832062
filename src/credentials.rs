//! Account credentials used to obtain an API key.
//!
//! Resolution order for each field: explicit value (CLI flag), then the
//! `PETFRIENDS_EMAIL` / `PETFRIENDS_PASSWORD` environment variables, then the
//! config file.

use crate::config::Config;
use crate::error::ClientError;
use std::fmt;

pub const EMAIL_ENV: &str = "PETFRIENDS_EMAIL";
pub const PASSWORD_ENV: &str = "PETFRIENDS_PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn resolve(
        config: &Config,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ClientError> {
        let email = email
            .or_else(|| std::env::var(EMAIL_ENV).ok())
            .or_else(|| config.email.clone())
            .filter(|e| !e.is_empty())
            .ok_or(ClientError::MissingCredentials)?;
        let password = password
            .or_else(|| std::env::var(PASSWORD_ENV).ok())
            .or_else(|| config.password.clone())
            .ok_or(ClientError::MissingCredentials)?;
        Ok(Self::new(email, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
