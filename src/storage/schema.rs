//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Coin-Ledger database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Commemorative coin catalog
CREATE TABLE IF NOT EXISTS coins (
    id TEXT PRIMARY KEY,
    country TEXT NOT NULL,
    year INTEGER NOT NULL,
    description TEXT NOT NULL,
    mintage INTEGER NOT NULL,
    image_url TEXT NOT NULL,
    value_fdc REAL NOT NULL,
    value_bu REAL NOT NULL,
    value_be REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_coins_country ON coins(country);
CREATE INDEX IF NOT EXISTS idx_coins_year ON coins(year);

-- Collector accounts
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

-- Owned coins, at most one entry per user and coin
CREATE TABLE IF NOT EXISTS collection (
    id TEXT PRIMARY KEY,
    coin_id TEXT NOT NULL REFERENCES coins(id),
    user_id TEXT NOT NULL REFERENCES users(id),
    condition TEXT NOT NULL,
    notes TEXT,
    added_date TEXT NOT NULL,
    UNIQUE(user_id, coin_id)
);

CREATE INDEX IF NOT EXISTS idx_collection_user ON collection(user_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
