//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod handlers;
mod server;
mod storage;

pub use handlers::{
    IngestConfig, QueryConfig, ScheduleConfig, DEFAULT_MAX_QUERY_LIMIT, DEFAULT_MESSAGE,
    DEFAULT_QUERY_LIMIT, MAX_SCHEDULE_INTERVAL_SECS,
};
pub use server::ServerConfig;
pub use storage::{DynamoConfig, SqliteConfig, StorageConfig, StorageType, DEFAULT_TABLE_NAME};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "COST_TRACKER_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "COST_TRACKER";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "COST_TRACKER_LOG";
/// Environment variable selecting the log output format (`text` or `json`).
pub const LOG_FORMAT_ENV_VAR: &str = "COST_TRACKER_LOG_FORMAT";
/// Environment variable naming the DynamoDB table, set at deployment.
pub const TABLE_ENV_VAR: &str = "DDB_TABLE";

use serde::Deserialize;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Ingest handler configuration.
    pub ingest: IngestConfig,
    /// Query handler configuration.
    pub query: QueryConfig,
    /// Scheduled tick configuration.
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    /// 5. `TABLE_ENV_VAR` for the DynamoDB table name
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize()?;

        if let Ok(table) = std::env::var(TABLE_ENV_VAR) {
            config.storage.dynamo.table = table;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the handlers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.default_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ingest.default_message must not be empty".to_string(),
            ));
        }
        if self.query.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "query.default_limit must be at least 1".to_string(),
            ));
        }
        if self.query.max_limit < self.query.default_limit {
            return Err(ConfigError::Invalid(format!(
                "query.max_limit ({}) is below query.default_limit ({})",
                self.query.max_limit, self.query.default_limit
            )));
        }
        if self.storage.storage_type == StorageType::Dynamo && self.storage.dynamo.table.is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.dynamo.table must not be empty".to_string(),
            ));
        }
        match self.schedule.interval_secs {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "schedule.interval_secs must be at least 1".to_string(),
                ));
            }
            Some(secs) if secs > MAX_SCHEDULE_INTERVAL_SECS => {
                return Err(ConfigError::Invalid(format!(
                    "schedule.interval_secs ({}) exceeds {}",
                    secs, MAX_SCHEDULE_INTERVAL_SECS
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Create config for testing: in-process store, defaults elsewhere.
    pub fn for_test() -> Self {
        let mut config = Self::default();
        config.storage.storage_type = StorageType::Memory;
        config
    }
}
