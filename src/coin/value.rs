//! Resale value estimation from mintage
//!
//! Scarcity is approximated by the number of coins issued: five mintage
//! bands, each with one fixed value per grading condition.

use crate::coin::Condition;

/// Mintage assumed when a page does not state a parseable issuing volume
pub const DEFAULT_MINTAGE: u64 = 1_000_000;

/// Value returned for a condition tag outside the known grades
pub const DEFAULT_VALUE: f64 = 4.0;

/// Exclusive upper mintage bound of each band with its (FDC, BU, BE) values.
/// The last band is open-ended.
const BANDS: [(u64, [f64; 3]); 5] = [
    (100_000, [15.0, 30.0, 60.0]),
    (500_000, [8.0, 15.0, 30.0]),
    (1_000_000, [5.0, 10.0, 20.0]),
    (5_000_000, [4.0, 7.0, 14.0]),
    (u64::MAX, [3.0, 5.0, 10.0]),
];

/// Estimates the value of a coin in the given condition
///
/// # Example
///
/// ```
/// use coin_ledger::coin::{estimate, Condition};
///
/// assert_eq!(estimate(50_000, Condition::Be), 60.0);
/// assert_eq!(estimate(5_000_000, Condition::Fdc), 3.0);
/// ```
pub fn estimate(mintage: u64, condition: Condition) -> f64 {
    let values = BANDS
        .iter()
        .find(|(upper, _)| mintage < *upper)
        .map(|(_, values)| values)
        .unwrap_or(&BANDS[BANDS.len() - 1].1);

    match condition {
        Condition::Fdc => values[0],
        Condition::Bu => values[1],
        Condition::Be => values[2],
    }
}

/// Estimates a value from a free-form condition tag
///
/// Unknown tags yield [`DEFAULT_VALUE`] instead of failing.
pub fn estimate_value(mintage: u64, condition: &str) -> f64 {
    match Condition::from_db_string(condition) {
        Some(condition) => estimate(mintage, condition),
        None => DEFAULT_VALUE,
    }
}
