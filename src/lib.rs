//! Coin-Ledger: a commemorative 2-euro coin collection tracker
//!
//! This crate gathers coin metadata from public catalog pages, stores the
//! catalog and a collector's owned coins in SQLite, and exposes both over
//! a small JSON API.

pub mod api;
pub mod auth;
pub mod coin;
pub mod config;
pub mod output;
pub mod scraper;
pub mod storage;

use thiserror::Error;

/// Main error type for Coin-Ledger operations
#[derive(Debug, Error)]
pub enum CoinError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Coin-Ledger operations
pub type Result<T> = std::result::Result<T, CoinError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use coin::{estimate_value, CoinRecord, Condition, MergeKey};
pub use config::Config;
pub use scraper::{collect_coins, CoinPipeline, FallbackProvider, StaticCatalog};
pub use storage::{SqliteStorage, Storage};
