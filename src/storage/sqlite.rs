//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::coin::{CoinRecord, Condition};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{Coin, CoinFilter, CollectionEntry, CollectionItem, User, MAX_LISTED_COINS};
use crate::CoinError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

const COIN_COLUMNS: &str =
    "id, country, year, description, mintage, image_url, value_fdc, value_bu, value_be";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(CoinError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CoinError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, CoinError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn user_exists(&self, user_id: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM users WHERE id = ?1", params![user_id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }
}

/// Reads a coin starting at column `offset`
fn coin_from_row(row: &Row, offset: usize) -> rusqlite::Result<Coin> {
    Ok(Coin {
        id: row.get(offset)?,
        record: CoinRecord {
            country: row.get(offset + 1)?,
            year: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            mintage: mintage_from_row(row, offset + 4)?,
            image_url: row.get(offset + 5)?,
            value_fdc: row.get(offset + 6)?,
            value_bu: row.get(offset + 7)?,
            value_be: row.get(offset + 8)?,
        },
    })
}

fn mintage_from_row(row: &Row, index: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(index)?;
    u64::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(e))
    })
}

fn condition_from_row(row: &Row, index: usize) -> rusqlite::Result<Condition> {
    let raw: String = row.get(index)?;
    Condition::from_db_string(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unknown condition '{}'", raw).into(),
        )
    })
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl Storage for SqliteStorage {
    // ===== Catalog =====

    fn insert_coins(&mut self, coins: &[CoinRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO coins ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                COIN_COLUMNS
            ))?;

            for coin in coins {
                let mintage = i64::try_from(coin.mintage)
                    .map_err(|_| StorageError::MintageOutOfRange(coin.mintage))?;
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    coin.country,
                    coin.year,
                    coin.description,
                    mintage,
                    coin.image_url,
                    coin.value_fdc,
                    coin.value_bu,
                    coin.value_be,
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Inserted {} coins", coins.len());
        Ok(coins.len())
    }

    fn count_coins(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM coins", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn list_coins(&self, filter: &CoinFilter) -> StorageResult<Vec<Coin>> {
        let query = format!(
            "SELECT {}
             FROM coins
             WHERE (?1 IS NULL OR country = ?1)
               AND (?2 IS NULL OR year = ?2)
               AND (?3 IS NULL
                    OR instr(lower(description), lower(?3)) > 0
                    OR instr(lower(country), lower(?3)) > 0)
             ORDER BY year DESC, country, rowid
             LIMIT ?4",
            COIN_COLUMNS
        );

        let mut stmt = self.conn.prepare(&query)?;
        let coins = stmt
            .query_map(
                params![filter.country, filter.year, filter.search, MAX_LISTED_COINS],
                |row| coin_from_row(row, 0),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(coins)
    }

    fn get_coin(&self, coin_id: &str) -> StorageResult<Option<Coin>> {
        let coin = self
            .conn
            .query_row(
                &format!("SELECT {} FROM coins WHERE id = ?1", COIN_COLUMNS),
                params![coin_id],
                |row| coin_from_row(row, 0),
            )
            .optional()?;
        Ok(coin)
    }

    fn list_countries(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT country FROM coins ORDER BY country")?;
        let countries = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(countries)
    }

    fn list_years(&self) -> StorageResult<Vec<i32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT year FROM coins ORDER BY year DESC")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(years)
    }

    // ===== Accounts =====

    fn create_user(&mut self, username: &str, password_hash: &str) -> StorageResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };

        self.conn
            .execute(
                "INSERT INTO users (id, username, password_hash) VALUES (?1, ?2, ?3)",
                params![user.id, user.username, user.password_hash],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::DuplicateUser(username.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(user)
    }

    fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    // ===== Collection =====

    fn add_collection_item(
        &mut self,
        user_id: &str,
        coin_id: &str,
        condition: Condition,
        notes: Option<&str>,
    ) -> StorageResult<CollectionItem> {
        if self.get_coin(coin_id)?.is_none() {
            return Err(StorageError::CoinNotFound(coin_id.to_string()));
        }
        if !self.user_exists(user_id)? {
            return Err(StorageError::UserNotFound(user_id.to_string()));
        }

        let item = CollectionItem {
            id: Uuid::new_v4().to_string(),
            coin_id: coin_id.to_string(),
            user_id: user_id.to_string(),
            condition,
            notes: notes.map(str::to_string),
            added_date: Utc::now().to_rfc3339(),
        };

        self.conn
            .execute(
                "INSERT INTO collection (id, coin_id, user_id, condition, notes, added_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    item.id,
                    item.coin_id,
                    item.user_id,
                    item.condition.to_db_string(),
                    item.notes,
                    item.added_date,
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    StorageError::AlreadyOwned(coin_id.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(item)
    }

    fn list_collection(&self, user_id: &str) -> StorageResult<Vec<CollectionEntry>> {
        let query = "
            SELECT c.id, c.coin_id, c.user_id, c.condition, c.notes, c.added_date,
                   k.id, k.country, k.year, k.description, k.mintage, k.image_url,
                   k.value_fdc, k.value_bu, k.value_be
            FROM collection c
            JOIN coins k ON k.id = c.coin_id
            WHERE c.user_id = ?1
            ORDER BY c.added_date, c.rowid
        ";

        let mut stmt = self.conn.prepare(query)?;
        let entries = stmt
            .query_map(params![user_id], |row| {
                Ok(CollectionEntry {
                    item: CollectionItem {
                        id: row.get(0)?,
                        coin_id: row.get(1)?,
                        user_id: row.get(2)?,
                        condition: condition_from_row(row, 3)?,
                        notes: row.get(4)?,
                        added_date: row.get(5)?,
                    },
                    coin: coin_from_row(row, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn remove_collection_item(&mut self, user_id: &str, item_id: &str) -> StorageResult<()> {
        let removed = self.conn.execute(
            "DELETE FROM collection WHERE id = ?1 AND user_id = ?2",
            params![item_id, user_id],
        )?;

        if removed == 0 {
            return Err(StorageError::ItemNotFound(item_id.to_string()));
        }
        Ok(())
    }

    fn update_collection_item(
        &mut self,
        user_id: &str,
        item_id: &str,
        condition: Option<Condition>,
        notes: Option<&str>,
    ) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE collection
             SET condition = COALESCE(?1, condition), notes = COALESCE(?2, notes)
             WHERE id = ?3 AND user_id = ?4",
            params![
                condition.map(|c| c.to_db_string()),
                notes,
                item_id,
                user_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::ItemNotFound(item_id.to_string()));
        }
        Ok(())
    }

    fn count_collection(&self, user_id: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM collection WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
