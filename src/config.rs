//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, applies the
//! `PORT` environment override, and defines constants for collection names,
//! response payloads, logging defaults and shutdown timing. `AppConfig` is the
//! root configuration struct containing all settings.

use std::path::{Path, PathBuf};

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// HTTP
// =============================================================================

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listening port when neither the config file nor `PORT` set one
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Environment variable that overrides the listening port
pub const PORT_ENV_VAR: &str = "PORT";

/// API responses are per-request and must never be cached by intermediaries
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Seconds to wait for in-flight requests after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Collections and Payloads
// =============================================================================

/// Collection receiving contact form submissions
pub const CONTACT_COLLECTION: &str = "contact";

/// Collection receiving connectivity probe records
pub const HEARTBEAT_COLLECTION: &str = "heartbeat";

/// Value stored in `source` when a submission omits it
pub const DEFAULT_CONTACT_SOURCE: &str = "portfolio";

/// Liveness message returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "Portfolio API running";

/// Maximum characters of a store error echoed back by the connectivity probe
pub const PROBE_ERROR_MAX_CHARS: usize = 120;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Configuration file loaded when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Directory used by the file store when `store.path` is not set
pub const DEFAULT_STORE_PATH: &str = "data";

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str =
    formatcp!("{}=info,tower_http=info", env!("CARGO_CRATE_NAME"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Document store backend
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Which document store implementation backs the persistence gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// No store configured; every write reports the database as unavailable
    #[default]
    None,
    /// Process-local collections, lost on restart
    Memory,
    /// Append-only JSON lines, one file per collection
    File,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Data directory for the file backend
    #[serde(default = "StoreConfig::default_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: Self::default_path(),
        }
    }
}

impl StoreConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_STORE_PATH)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the given file, or fall back to
    /// [`DEFAULT_CONFIG_PATH`] and then to built-in defaults.
    ///
    /// An explicitly requested file must exist. The `PORT` environment
    /// variable is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_port_override(std::env::var(PORT_ENV_VAR).ok().as_deref())?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Replace `http.port` with the value of the `PORT` variable, if set.
    pub fn apply_port_override(&mut self, port: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = port else {
            return Ok(());
        };

        self.http.port = raw.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "{PORT_ENV_VAR} must be a port number between 0 and 65535, got {raw:?}"
            ))
        })?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.store.backend, StoreBackend::None);
        assert_eq!(config.store.path, PathBuf::from("data"));
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [http]
            host = "127.0.0.1"
            port = 9000

            [store]
            backend = "file"
            path = "/var/lib/portfolio"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, PathBuf::from("/var/lib/portfolio"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_STORE_PATH));
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [store]
            backend = "mongo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_port_override() {
        let mut config = AppConfig::default();
        config.apply_port_override(Some("3000")).unwrap();
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_port_override_absent_keeps_configured_port() {
        let mut config = AppConfig::default();
        config.http.port = 9100;
        config.apply_port_override(None).unwrap();
        assert_eq!(config.http.port, 9100);
    }

    #[test]
    fn test_port_override_rejects_garbage() {
        let mut config = AppConfig::default();
        let err = config.apply_port_override(Some("eighty")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 8123").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http.port, 8123);
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_default_log_filter_names_crate() {
        assert_eq!(DEFAULT_LOG_FILTER, "portfolio_api=info,tower_http=info");
    }
}
