//! Output module for reports derived from stored data
//!
//! This module handles computing and printing collection statistics.

pub mod stats;

pub use stats::{load_statistics, print_statistics, CollectionStatistics};
