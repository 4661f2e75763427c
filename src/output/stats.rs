//! Collection statistics
//!
//! This module computes a collector's progress and the estimated value of
//! their coins from the storage layer, and prints it for the CLI.

use crate::storage::Storage;
use crate::CoinError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one user's collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStatistics {
    /// Number of coins in the catalog
    pub total_coins: u64,

    /// Number of coins the user owns
    pub owned_coins: u64,

    /// owned / total * 100, rounded to two decimals
    pub completion_percentage: f64,

    /// Sum of each owned coin's value for its recorded condition
    pub total_value: f64,

    /// Owned coins per country, sorted by country
    pub by_country: BTreeMap<String, u64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Loads statistics for a user from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `user_id` - The collector whose items are counted
pub fn load_statistics(
    storage: &dyn Storage,
    user_id: &str,
) -> Result<CollectionStatistics, CoinError> {
    let total_coins = storage.count_coins()?;
    let entries = storage.list_collection(user_id)?;

    let owned_coins = entries.len() as u64;
    let total_value: f64 = entries.iter().map(|entry| entry.value()).sum();

    let mut by_country = BTreeMap::new();
    for entry in &entries {
        *by_country.entry(entry.coin.record.country.clone()).or_insert(0) += 1;
    }

    let completion_percentage = if total_coins > 0 {
        owned_coins as f64 / total_coins as f64 * 100.0
    } else {
        0.0
    };

    Ok(CollectionStatistics {
        total_coins,
        owned_coins,
        completion_percentage: round2(completion_percentage),
        total_value: round2(total_value),
        by_country,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CollectionStatistics) {
    println!("=== Collection Statistics ===\n");

    println!("Overview:");
    println!("  Coins in catalog: {}", stats.total_coins);
    println!("  Coins owned: {}", stats.owned_coins);
    println!("  Completion: {:.2}%", stats.completion_percentage);
    println!("  Estimated value: {:.2} EUR", stats.total_value);
    println!();

    if !stats.by_country.is_empty() {
        println!("Owned by Country ({}):", stats.by_country.len());
        for (country, count) in &stats.by_country {
            println!("  {}: {}", country, count);
        }
        println!();
    }
}
