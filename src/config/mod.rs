//! Configuration loading and management
//!
//! Configuration is resolved once at startup, in increasing precedence:
//! built-in defaults, an optional YAML file, then environment variables
//! (a `.env` file is loaded first when present). The result is an immutable
//! [`AppConfig`] that is passed explicitly to the store and the server.
//!
//! # Environment variables
//!
//! | Variable | Meaning |
//! |---|---|
//! | `APP_ENVIRONMENT` / `ASPNETCORE_ENVIRONMENT` | `production` selects the server backend |
//! | `STORE_BACKEND` | explicit backend: `postgres`, `sqlite` or `memory` |
//! | `DATABASE_URL` / `ConnectionStrings__MyDbConnection` | production connection string |
//! | `SQLITE_PATH` | local database file |
//! | `DB_MAX_CONNECTIONS` | pool size |
//! | `BIND_ADDR` | listen address |
//! | `STATIC_DIR` | directory served for unmatched paths |
//! | `CREATE_MODE` | `upsert` or `insert_only` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("the postgres backend requires DATABASE_URL to be set")]
    MissingDatabaseUrl,

    #[error("backend '{backend}' is not available: rebuild with the `{feature}` feature")]
    BackendUnavailable {
        backend: &'static str,
        feature: &'static str,
    },
}

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    /// Anything other than "production" (case-insensitive) is development
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Backing store implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Postgres,
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORE_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// What `POST /invoices` does when the body carries an existing id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// Overwrite the existing row and answer 200
    #[default]
    Upsert,
    /// Refuse with 409
    InsertOnly,
}

impl FromStr for CreateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(CreateMode::Upsert),
            "insert_only" | "insert-only" => Ok(CreateMode::InsertOnly),
            _ => Err(ConfigError::InvalidValue {
                key: "CREATE_MODE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Explicit backend; derived from the environment when absent
    pub backend: Option<StoreBackend>,

    /// Connection string of the production server
    pub database_url: Option<String>,

    /// File used by the SQLite backend
    pub sqlite_path: String,

    pub max_connections: u32,

    pub acquire_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            database_url: None,
            sqlite_path: "localdatabase.db".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl StoreConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Directory served for paths no route matches
    pub static_dir: Option<PathBuf>,

    pub create_mode: CreateMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            static_dir: None,
            create_mode: CreateMode::default(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Resolve the full configuration from file and process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        skip_missing_env_file(dotenvy::dotenv().map(|_| ()))?;

        let base = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        let config = base.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(*key).filter(|v| !v.trim().is_empty()))
        };

        if let Some(flag) = get(&["APP_ENVIRONMENT", "ASPNETCORE_ENVIRONMENT"]) {
            self.environment = Environment::from_flag(&flag);
        }
        if let Some(backend) = get(&["STORE_BACKEND"]) {
            self.store.backend = Some(backend.parse()?);
        }
        if let Some(url) = get(&["DATABASE_URL", "ConnectionStrings__MyDbConnection"]) {
            self.store.database_url = Some(url);
        }
        if let Some(path) = get(&["SQLITE_PATH"]) {
            self.store.sqlite_path = path;
        }
        if let Some(max) = get(&["DB_MAX_CONNECTIONS"]) {
            self.store.max_connections =
                max.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "DB_MAX_CONNECTIONS".to_string(),
                        value: max.clone(),
                    })?;
        }
        if let Some(addr) = get(&["BIND_ADDR"]) {
            self.server.bind_addr = addr;
        }
        if let Some(dir) = get(&["STATIC_DIR"]) {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(mode) = get(&["CREATE_MODE"]) {
            self.server.create_mode = mode.parse()?;
        }

        Ok(self)
    }

    /// The backend actually used: explicit choice, else derived from the environment
    pub fn backend(&self) -> StoreBackend {
        self.store.backend.unwrap_or(match self.environment {
            Environment::Production => StoreBackend::Postgres,
            Environment::Development => StoreBackend::Sqlite,
        })
    }

    /// Check cross-field requirements
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend() == StoreBackend::Postgres && self.store.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        if self.store.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// A missing `.env` file is fine; one that exists must parse
fn skip_missing_env_file(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(e) if e.not_found() => Ok(()),
        other => other.map_err(ConfigError::from),
    }
}
