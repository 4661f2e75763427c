//! Scraper module for the coin acquisition pipeline
//!
//! This module contains everything needed to build the coin catalog:
//! - HTTP fetching with a shared client
//! - A sequential fetch loop with a fixed delay between pages
//! - Strategy-based page extraction for both sources
//! - Reconciliation of the two record sets
//! - Default data substituted when scraping produces nothing

mod extract;
mod fallback;
mod fetch_loop;
mod fetcher;
mod html;
mod merge;
mod primary;
mod secondary;

pub use extract::{PageExtractor, Records, Strategy};
pub use fallback::{FallbackProvider, StaticCatalog};
pub use fetch_loop::FetchLoop;
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use merge::merge;
pub use primary::{
    parse_issuing_volume, primary_extractor, scrape_primary, year_page_url, YearPage,
    UNKNOWN_COUNTRY,
};
pub use secondary::{
    country_name, country_page_url, extract_prices, scrape_secondary, secondary_extractor,
    CountryPage, Prices,
};

use crate::coin::CoinRecord;
use crate::config::ScraperConfig;
use crate::CoinError;
use std::time::Duration;

/// The acquisition pipeline: scrape, merge, fall back
pub struct CoinPipeline {
    config: ScraperConfig,
    fallback: Box<dyn FallbackProvider + Send + Sync>,
}

impl CoinPipeline {
    /// Creates a pipeline that falls back to the built-in [`StaticCatalog`]
    pub fn new(config: ScraperConfig) -> Self {
        Self::with_fallback(config, StaticCatalog)
    }

    /// Creates a pipeline with a custom fallback data provider
    pub fn with_fallback<F>(config: ScraperConfig, fallback: F) -> Self
    where
        F: FallbackProvider + Send + Sync + 'static,
    {
        Self {
            config,
            fallback: Box::new(fallback),
        }
    }

    /// Produces the current best-known list of coins
    ///
    /// Never fails: a scrape error or an empty result yields the fallback
    /// data set instead.
    pub async fn collect(&self) -> Vec<CoinRecord> {
        let scraped = match self.scrape().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Scrape failed: {}", e);
                Vec::new()
            }
        };

        if scraped.is_empty() {
            let fallback = self.fallback.records();
            tracing::warn!("No coins scraped, using {} fallback coins", fallback.len());
            return fallback;
        }

        tracing::info!("Collected {} coins", scraped.len());
        scraped
    }

    async fn scrape(&self) -> Result<Vec<CoinRecord>, CoinError> {
        let client = build_http_client(&self.config)?;
        let fetch_loop = FetchLoop::new(&client, Duration::from_millis(self.config.request_delay));

        tracing::info!(
            "Scraping primary source for {}-{}",
            self.config.first_year,
            self.config.last_year
        );
        let primary = scrape_primary(&fetch_loop, &self.config).await?;

        if !self.config.secondary_enabled {
            return Ok(primary);
        }

        tracing::info!(
            "Scraping secondary source for {} countries",
            self.config.countries.len()
        );
        let secondary = scrape_secondary(&fetch_loop, &self.config).await?;

        Ok(merge(primary, secondary))
    }
}

/// Runs the pipeline with the built-in fallback data
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// A non-empty list of coins, scraped or fallback.
pub async fn collect_coins(config: &ScraperConfig) -> Vec<CoinRecord> {
    CoinPipeline::new(config.clone()).collect().await
}
