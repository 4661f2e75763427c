//! Sequential fetch loop
//!
//! Walks a fixed list of items (years, country slugs), fetches one page per
//! item and hands each successful body to an extraction closure. Failures are
//! logged and skipped; nothing is retried and nothing aborts the loop.

use crate::coin::CoinRecord;
use crate::scraper::fetcher::{fetch_page, FetchResult};
use reqwest::Client;
use std::fmt::Display;
use std::time::Duration;

/// Fetches items one at a time with a fixed delay between requests
pub struct FetchLoop<'c> {
    client: &'c Client,
    delay: Duration,
}

impl<'c> FetchLoop<'c> {
    pub fn new(client: &'c Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Runs the loop and concatenates every page's records in item order
    ///
    /// # Arguments
    ///
    /// * `items` - The items to visit, in order
    /// * `url_for` - Builds the page URL of an item
    /// * `extract` - Turns a fetched body into records
    pub async fn run<I, T, U, E>(&self, items: I, url_for: U, extract: E) -> Vec<CoinRecord>
    where
        I: IntoIterator<Item = T>,
        T: Display,
        U: Fn(&T) -> String,
        E: Fn(&str, &T) -> Vec<CoinRecord>,
    {
        let mut records = Vec::new();
        let mut pages_ok = 0usize;
        let mut pages_failed = 0usize;

        for (index, item) in items.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let url = url_for(&item);
            tracing::info!("Scraping {}: {}", item, url);

            match fetch_page(self.client, &url).await {
                FetchResult::Success { body, final_url, .. } => {
                    let found = extract(&body, &item);
                    tracing::info!("Found {} coins for {} ({})", found.len(), item, final_url);
                    records.extend(found);
                    pages_ok += 1;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!("HTTP {} for {}, skipping {}", status_code, url, item);
                    pages_failed += 1;
                }
                FetchResult::NetworkError { error } => {
                    tracing::error!("Error scraping {}: {}", item, error);
                    pages_failed += 1;
                }
            }
        }

        tracing::info!(
            "Fetch loop done: {} pages ok, {} failed, {} coins",
            pages_ok,
            pages_failed,
            records.len()
        );

        records
    }
}
