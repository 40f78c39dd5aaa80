//! Server configuration.
//!
//! Settings are layered, later sources winning:
//!
//! ```text
//! built-in defaults
//!      │
//!      ▼
//! backoffice.toml (optional, working directory)
//!      │
//!      ▼
//! BACKOFFICE_* environment variables
//!      e.g. BACKOFFICE_PORT=9000, BACKOFFICE_DATABASE_PATH=/var/lib/bo.db
//! ```

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file name, without extension.
pub const CONFIG_FILE: &str = "backoffice";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BACKOFFICE";

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size (>= 1)
    pub max_connections: u32,

    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: "backoffice.db".to_string(),
            max_connections: 5,
            log_filter: "info,backoffice=debug,sqlx=warn".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `backoffice.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads configuration using `file` (without extension) as the optional file layer.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config: ApiConfig = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_path", defaults.database_path)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue("database_path".to_string()));
        }
        Ok(())
    }

    /// `host:port`, ready for a TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
