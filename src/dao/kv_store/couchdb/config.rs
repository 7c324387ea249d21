//! Environment-driven CouchDB connection settings.

use super::error::{CouchDaoError, CouchResult};

const BASE_URL_VAR: &str = "COUCH_BASE_URL";
const DATABASE_VAR: &str = "COUCH_DB";
const USERNAME_VAR: &str = "COUCH_USERNAME";
const PASSWORD_VAR: &str = "COUCH_PASSWORD";

/// Connection settings for the CouchDB key-value backend.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server root, e.g. `http://localhost:5984`.
    pub base_url: String,
    /// Database holding the `kv::` documents.
    pub database: String,
    /// Basic-auth `(username, password)`, if the server requires it.
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    /// Settings without credentials.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            credentials: None,
        }
    }

    /// Attach basic-auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Read `COUCH_BASE_URL` and `COUCH_DB`, plus optional credentials.
    pub fn from_env() -> CouchResult<Self> {
        let base_url = std::env::var(BASE_URL_VAR)
            .map_err(|_| CouchDaoError::MissingEnvVar { var: BASE_URL_VAR })?;
        let database = std::env::var(DATABASE_VAR)
            .map_err(|_| CouchDaoError::MissingEnvVar { var: DATABASE_VAR })?;

        let config = Self::new(base_url, database);
        Ok(
            match (std::env::var(USERNAME_VAR), std::env::var(PASSWORD_VAR)) {
                (Ok(username), Ok(password)) => config.with_credentials(username, password),
                _ => config,
            },
        )
    }
}
