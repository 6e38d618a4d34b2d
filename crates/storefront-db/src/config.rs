//! Catalog configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pool::DbConfig;

/// Default SQLite file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./storefront.db";

/// Default location of the seed dataset.
pub const DEFAULT_SEED_FILE: &str = "./data/full-products.json";

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// SQLite database file (`STOREFRONT_DB_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`STOREFRONT_DB_MAX_CONNECTIONS`, default: 5)
    pub max_connections: u32,

    /// JSON array of products to import (`STOREFRONT_SEED_FILE`)
    pub seed_file: PathBuf,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        CatalogConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = match lookup("STOREFRONT_DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue("STOREFRONT_DB_MAX_CONNECTIONS".to_string())
                })?,
            None => 5,
        };

        Ok(CatalogConfig {
            database_path: lookup("STOREFRONT_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),
            max_connections,
            seed_file: lookup("STOREFRONT_SEED_FILE")
                .unwrap_or_else(|| DEFAULT_SEED_FILE.to_string())
                .into(),
        })
    }

    /// Pool configuration for this catalog.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
