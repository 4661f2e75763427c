//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::coin::{CoinRecord, Condition};
use crate::storage::{Coin, CoinFilter, CollectionEntry, CollectionItem, User};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Coin not found: {0}")]
    CoinNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Collection item not found: {0}")]
    ItemNotFound(String),

    #[error("Coin {0} is already in the collection")]
    AlreadyOwned(String),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    #[error("Mintage {0} does not fit in the database")]
    MintageOutOfRange(u64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Read operations take `&self`, writes take `&mut self`.
pub trait Storage {
    // ===== Catalog =====

    /// Inserts scraped coins, assigning each a new id
    ///
    /// # Returns
    ///
    /// The number of coins inserted
    fn insert_coins(&mut self, coins: &[CoinRecord]) -> StorageResult<usize>;

    /// Counts the coins in the catalog
    fn count_coins(&self) -> StorageResult<u64>;

    /// Lists catalog coins matching the filter, newest first
    fn list_coins(&self, filter: &CoinFilter) -> StorageResult<Vec<Coin>>;

    /// Gets a coin by id
    fn get_coin(&self, coin_id: &str) -> StorageResult<Option<Coin>>;

    /// Distinct country names, ascending
    fn list_countries(&self) -> StorageResult<Vec<String>>;

    /// Distinct issue years, newest first
    fn list_years(&self) -> StorageResult<Vec<i32>>;

    // ===== Accounts =====

    /// Creates a user with an already hashed password
    fn create_user(&mut self, username: &str, password_hash: &str) -> StorageResult<User>;

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    // ===== Collection =====

    /// Adds a catalog coin to a user's collection
    ///
    /// # Errors
    ///
    /// * `CoinNotFound` - No coin with this id
    /// * `UserNotFound` - No user with this id
    /// * `AlreadyOwned` - The user already owns this coin
    fn add_collection_item(
        &mut self,
        user_id: &str,
        coin_id: &str,
        condition: Condition,
        notes: Option<&str>,
    ) -> StorageResult<CollectionItem>;

    /// Lists a user's items joined with their coins, oldest first
    fn list_collection(&self, user_id: &str) -> StorageResult<Vec<CollectionEntry>>;

    /// Removes one of the user's items (`ItemNotFound` if it has none with this id)
    fn remove_collection_item(&mut self, user_id: &str, item_id: &str) -> StorageResult<()>;

    /// Updates the condition and/or notes of one of the user's items
    ///
    /// `None` leaves the field unchanged.
    fn update_collection_item(
        &mut self,
        user_id: &str,
        item_id: &str,
        condition: Option<Condition>,
        notes: Option<&str>,
    ) -> StorageResult<()>;

    /// Counts the items in a user's collection
    fn count_collection(&self, user_id: &str) -> StorageResult<u64>;
}
