//! Session configuration: connection parameters and telemetry controls.
//!
//! The interactive session remembers its last-used connection descriptor and
//! username in a small JSON file so the operator does not retype them; the
//! password never touches this module (it belongs to the external secret
//! store). Environment variables override both the file and the defaults.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration for one interactive session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub connection: ConnectionConfig,
    pub telemetry: TelemetryConfig,
}

impl SessionConfig {
    /// Loads from the environment (`CADASTRO_DSN`, `CADASTRO_USER`,
    /// `CADASTRO_LOG_LEVEL`), falling back to development defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let dsn =
            env::var("CADASTRO_DSN").unwrap_or_else(|_| "localhost:1521/XEPDB1".to_string());
        let user = env::var("CADASTRO_USER").unwrap_or_else(|_| "xdb".to_string());
        let log_level = env::var("CADASTRO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            connection: ConnectionConfig { dsn, user },
            telemetry: TelemetryConfig { log_level },
        }
    }
}

/// Where and as whom to connect. The descriptor is either a
/// `host:port/service_name` string or a TNS alias resolved by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub dsn: String,
    pub user: String,
}

impl ConnectionConfig {
    /// Reads the last-used parameters; `None` when no file was saved yet.
    pub fn load_saved(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let saved = serde_json::from_str(&text).map_err(|source| ConfigError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(saved))
    }

    /// Persists the parameters for the next session, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Malformed {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("CADASTRO_DSN");
        env::remove_var("CADASTRO_USER");
        env::remove_var("CADASTRO_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = SessionConfig::load();
        assert_eq!(config.connection.dsn, "localhost:1521/XEPDB1");
        assert_eq!(config.connection.user, "xdb");
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn environment_overrides_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CADASTRO_DSN", "db.example.com:1521/PROD");
        env::set_var("CADASTRO_USER", "finance");
        let config = SessionConfig::load();
        assert_eq!(config.connection.dsn, "db.example.com:1521/PROD");
        assert_eq!(config.connection.user, "finance");
        reset_env();
    }

    #[test]
    fn saved_connection_round_trips_without_password() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        let connection = ConnectionConfig {
            dsn: "localhost:1521/XEPDB1".to_string(),
            user: "xdb".to_string(),
        };
        connection.save(&path).expect("saves");

        let text = std::fs::read_to_string(&path).expect("readable");
        assert!(!text.to_lowercase().contains("password"));

        let loaded = ConnectionConfig::load_saved(&path)
            .expect("loads")
            .expect("present");
        assert_eq!(loaded, connection);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = ConnectionConfig::load_saved(&dir.path().join("absent.json")).expect("ok");
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("writes");
        assert!(matches!(
            ConnectionConfig::load_saved(&path),
            Err(ConfigError::Malformed { .. })
        ));
    }
}
