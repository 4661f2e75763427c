//! Storage module for persisting the catalog and collections
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - The coin catalog produced by the scrape pipeline
//! - Collector accounts
//! - Each collector's owned coins

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::coin::{CoinRecord, Condition};
use crate::CoinError;
use serde::Serialize;
use std::path::Path;

/// Maximum number of coins returned by one catalog query
pub const MAX_LISTED_COINS: u32 = 1000;

/// Opens (or creates) a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CoinError> {
    SqliteStorage::new(path)
}

/// A catalog coin with its storage id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coin {
    pub id: String,
    #[serde(flatten)]
    pub record: CoinRecord,
}

/// A collector account
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// One coin owned by a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionItem {
    pub id: String,
    pub coin_id: String,
    pub user_id: String,
    pub condition: Condition,
    pub notes: Option<String>,
    /// RFC 3339 timestamp
    pub added_date: String,
}

/// A collection item joined with its catalog coin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionEntry {
    #[serde(flatten)]
    pub item: CollectionItem,
    pub coin: Coin,
}

impl CollectionEntry {
    /// Value of the owned copy, given its recorded condition
    pub fn value(&self) -> f64 {
        self.coin.record.value_for(self.item.condition)
    }
}

/// Catalog query filters; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct CoinFilter {
    /// Exact country name
    pub country: Option<String>,
    pub year: Option<i32>,
    /// Case-insensitive substring of the description or the country
    pub search: Option<String>,
}
