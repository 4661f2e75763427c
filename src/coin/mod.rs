//! Coin data model
//!
//! This module defines the records produced by the scrape pipeline and the
//! pure valuation table shared by the scrapers and the statistics code.

mod condition;
mod record;
mod value;

pub use condition::Condition;
pub use record::{
    truncate_description, CoinRecord, MergeKey, GENERIC_IMAGE_URL, MAX_DESCRIPTION_LEN,
};
pub use value::{estimate, estimate_value, DEFAULT_MINTAGE, DEFAULT_VALUE};
