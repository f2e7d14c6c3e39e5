use crate::core::db::ZeroRowsPolicy;
use crate::core::{CrudError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the database lives and how each connection is opened.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub foreign_keys: bool,
}

impl DatabaseConfig {
    /// Configuration for `path` with every option at its default.
    pub fn new(path: impl Into<String>) -> Self {
        DatabaseConfig {
            path: path.into(),
            create_if_missing: true,
            read_only: false,
            busy_timeout_ms: default_busy_timeout_ms(),
            foreign_keys: true,
        }
    }
}

/// Execution policies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub delete_zero_rows: ZeroRowsPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| CrudError::Config(e.to_string()))?;
        if config.database.path.trim().is_empty() {
            return Err(CrudError::Config("database.path must not be empty".to_string()));
        }
        Ok(config)
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = crudaux::config::load_config("crudaux.toml").expect("Failed to load config");
/// println!("{:?}", config.database.path);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Config::from_toml_str(&content)
}

/// `<config dir>/crudaux/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("crudaux").join("config.toml"))
}
