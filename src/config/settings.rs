//! Application settings.
//!
//! Settings come from an optional TOML file (`SAMPLE_BANK_CONFIG`, falling back to
//! `./config.toml`). Every key has a default, so a missing file yields the same
//! listen port, database and CORS origin the service has always used.
//! `DATABASE_URL` in the environment (or `.env`) overrides `database.url`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP listener binds to
    pub listen_address: String,
    /// The single origin allowed to make cross-origin requests
    pub allowed_origin: String,
    /// Insert the demo client on startup when the store is empty
    pub seed_demo_data: bool,
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8050".to_string(),
            allowed_origin: "http://localhost:3500".to_string(),
            seed_demo_data: false,
            database: DatabaseConfig::default(),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL (`sqlite://...` or `postgres://...`)
    pub url: String,
    /// Log every SQL statement through `tracing`
    pub log_statements: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/sample_bank.sqlite?mode=rwc".to_string(),
            log_statements: true,
        }
    }
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Resolves the settings used at startup.
///
/// A missing settings file is not an error; defaults apply. Environment
/// overrides are applied last.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("SAMPLE_BANK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!(path = %path, "Loaded configuration file");
        config
    } else {
        info!(path = %path, "No configuration file found, using defaults");
        AppConfig::default()
    };

    Ok(apply_env_overrides(config, std::env::var("DATABASE_URL").ok()))
}

fn apply_env_overrides(mut config: AppConfig, database_url: Option<String>) -> AppConfig {
    if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
        debug!("DATABASE_URL overrides database.url");
        config.database.url = url;
    }
    config
}
