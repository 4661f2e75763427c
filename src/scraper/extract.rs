//! Strategy-based page extraction
//!
//! A page layout is handled by an ordered list of named strategies. Each
//! strategy lazily yields records from a parsed document; the first strategy
//! that yields anything wins and the remaining ones are never run.

use crate::coin::CoinRecord;
use scraper::Html;

/// Lazy sequence of records borrowed from a parsed document
pub type Records<'a> = Box<dyn Iterator<Item = CoinRecord> + 'a>;

/// One extraction heuristic over a parsed document and its page context
pub type Strategy<C> = for<'a> fn(&'a Html, &'a C) -> Records<'a>;

/// Applies a list of strategies to one fetched page
pub struct PageExtractor<C> {
    strategies: Vec<(&'static str, Strategy<C>)>,
}

impl<C> PageExtractor<C> {
    /// Creates an extractor that tries `strategies` in order
    pub fn new(strategies: Vec<(&'static str, Strategy<C>)>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|(name, _)| *name).collect()
    }

    /// Parses `html` and runs the strategies until one yields records
    pub fn extract(&self, html: &str, context: &C) -> Vec<CoinRecord> {
        let document = Html::parse_document(html);
        self.extract_document(&document, context)
    }

    /// Runs the strategies over an already parsed document
    pub fn extract_document(&self, document: &Html, context: &C) -> Vec<CoinRecord> {
        for (name, strategy) in &self.strategies {
            let mut records = strategy(document, context).peekable();
            if records.peek().is_some() {
                let records: Vec<CoinRecord> = records.collect();
                tracing::debug!("{} strategy extracted {} coins", name, records.len());
                return records;
            }
            tracing::debug!("{} strategy found nothing", name);
        }
        tracing::debug!("No coins found (tried {})", self.strategy_names().join(", "));
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing<'a>(_document: &'a Html, _year: &'a i32) -> Records<'a> {
        Box::new(std::iter::empty())
    }

    fn one_coin<'a>(_document: &'a Html, year: &'a i32) -> Records<'a> {
        Box::new(std::iter::once(CoinRecord::estimated(
            "Testland",
            *year,
            "first",
            1_000,
            "https://x/a.png",
        )))
    }

    fn two_coins<'a>(_document: &'a Html, year: &'a i32) -> Records<'a> {
        Box::new((0..2).map(move |i| {
            CoinRecord::estimated("Testland", *year, &format!("second {}", i), 1_000, "https://x/b.png")
        }))
    }

    #[test]
    fn test_first_productive_strategy_wins() {
        let extractor = PageExtractor::new(vec![
            ("empty", nothing as Strategy<i32>),
            ("one", one_coin as Strategy<i32>),
            ("two", two_coins as Strategy<i32>),
        ]);

        let records = extractor.extract("<html></html>", &2020);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "first");
        assert_eq!(records[0].year, 2020);
    }

    #[test]
    fn test_falls_through_to_later_strategy() {
        let extractor = PageExtractor::new(vec![
            ("empty", nothing as Strategy<i32>),
            ("two", two_coins as Strategy<i32>),
        ]);
        assert_eq!(extractor.extract("<html></html>", &2021).len(), 2);
    }

    #[test]
    fn test_no_strategy_yields_nothing() {
        let extractor = PageExtractor::new(vec![("empty", nothing as Strategy<i32>)]);
        assert!(extractor.extract("<html></html>", &2021).is_empty());
        assert_eq!(extractor.strategy_names(), vec!["empty"]);
    }
}
