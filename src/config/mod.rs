//! Configuration module for Coin-Ledger
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use coin_ledger::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scraping years {}..={}", config.scraper.first_year, config.scraper.last_year);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_countries, AccountConfig, Config, ScraperConfig, ServerConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
