//! Application configuration loaded from `config.toml`.
//!
//! The file is optional: every section has defaults, and a missing file yields
//! [`AppConfig::default`]. Environment variables (usually from `.env`) take
//! precedence over the file for values that differ between deployments.

use crate::config::catalog::StoreSeed;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "POS_CONFIG";
/// Environment variable overriding `[server] bind_address`
pub const BIND_ADDRESS_ENV: &str = "BIND_ADDRESS";
/// Environment variable overriding `[database] url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/pos.sqlite?mode=rwc";

/// Top-level configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Stores (and their products) to create on startup if missing
    #[serde(default)]
    pub stores: Vec<StoreSeed>,
}

/// `[server]` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP API listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// `[database]` section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    pub url: Option<String>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl AppConfig {
    /// Address to bind, preferring `BIND_ADDRESS` over the file.
    #[must_use]
    pub fn bind_address(&self) -> String {
        std::env::var(BIND_ADDRESS_ENV).unwrap_or_else(|_| self.server.bind_address.clone())
    }

    /// Database URL, preferring `DATABASE_URL` over the file, then the default `SQLite` path.
    #[must_use]
    pub fn database_url(&self) -> String {
        std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| {
            self.database
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
        })
    }
}

/// Parses configuration from a TOML string.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid or contains unknown keys.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `POS_CONFIG` or `./config.toml`, falling back to defaults
/// when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!("Config file {} not found, using defaults", path);
        return Ok(AppConfig::default());
    }
    load_config(&path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:8080"

            [database]
            url = "sqlite::memory:"

            [[stores]]
            name = "Main Street"
            address = "1 Main Street"

            [[stores.products]]
            name = "Green Tea"
            price = 4.5
            stock = 20
            sku = "TEA-001"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.stores.len(), 1);
        assert_eq!(config.stores[0].products.len(), 1);
        assert_eq!(config.stores[0].products[0].price, 4.5);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.database.url.is_none());
        assert!(config.stores.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = parse_config("[server]\nport = 3000\n");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
