//! Application-level configuration loading, including the key-value backend selection.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SWISH_TICKER_CONFIG_PATH";
/// Environment variable that overrides the configured port.
const PORT_ENV: &str = "PORT";
const DEFAULT_PORT: u16 = 8080;
/// Single file holding every key, as one preferences file would.
const DEFAULT_STORE_PATH: &str = "data/query_file.json";

/// Which key-value backend the query engine runs on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Nothing survives a restart.
    Memory,
    /// Whole map kept in one JSON file.
    File {
        /// Location of the store file; parent directories are created on open.
        #[serde(default = "default_store_path")]
        path: PathBuf,
    },
    /// Connection settings come from the `COUCH_*` environment variables.
    Couch,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server binds on all interfaces.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key-value backend selection.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|err| {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to parse config; falling back to defaults"
                );
                Self::default()
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Some(port) = env::var(PORT_ENV)
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
        {
            config.port = port;
        }

        info!(port = config.port, storage = ?config.storage, "configuration loaded");
        config
    }

    fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        assert_eq!(AppConfig::parse("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn file_backend_path_is_optional() {
        let config = AppConfig::parse(r#"{"storage":{"backend":"file"}}"#).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::File {
                path: PathBuf::from(DEFAULT_STORE_PATH)
            }
        );
    }

    #[test]
    fn explicit_backends_parse() {
        let config =
            AppConfig::parse(r#"{"port":9000,"storage":{"backend":"memory"}}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage, StorageConfig::Memory);

        let config = AppConfig::parse(r#"{"storage":{"backend":"couch"}}"#).unwrap();
        assert_eq!(config.storage, StorageConfig::Couch);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        assert!(AppConfig::parse(r#"{"storage":{"backend":"sqlite"}}"#).is_err());
    }
}
