//! Integration tests for Coin-Ledger
//!
//! Pipeline tests run the scrapers against wiremock servers; API tests
//! drive the axum router over a temporary database.

mod api_tests;
mod pipeline_tests;
