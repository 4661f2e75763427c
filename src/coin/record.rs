use crate::coin::{estimate, Condition};
use serde::{Deserialize, Serialize};

/// Maximum number of characters kept from a scraped description
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Stock picture used when a source offers no usable image for a coin
pub const GENERIC_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1585483391381-b96dda4fae8f?q=85&w=600&auto=format&fit=crop";

/// One commemorative coin as produced by the scrape pipeline
///
/// Every field is always populated; extractors substitute fallback values
/// for anything a page does not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub country: String,
    pub year: i32,
    pub description: String,
    pub mintage: u64,
    pub image_url: String,
    pub value_fdc: f64,
    pub value_bu: f64,
    pub value_be: f64,
}

impl CoinRecord {
    /// Builds a record whose three values are estimated from its mintage
    pub fn estimated(
        country: impl Into<String>,
        year: i32,
        description: &str,
        mintage: u64,
        image_url: impl Into<String>,
    ) -> Self {
        let description = if description.trim().is_empty() {
            format!("Commemorative coin {}", year)
        } else {
            truncate_description(description.trim())
        };

        Self {
            country: country.into(),
            year,
            description,
            mintage,
            image_url: image_url.into(),
            value_fdc: estimate(mintage, Condition::Fdc),
            value_bu: estimate(mintage, Condition::Bu),
            value_be: estimate(mintage, Condition::Be),
        }
    }

    /// Returns the estimated value for a grading condition
    pub fn value_for(&self, condition: Condition) -> f64 {
        match condition {
            Condition::Fdc => self.value_fdc,
            Condition::Bu => self.value_bu,
            Condition::Be => self.value_be,
        }
    }

    /// Returns the key used to join records from different sources
    pub fn merge_key(&self) -> MergeKey {
        MergeKey::new(&self.country, self.year)
    }

    /// True when the image is missing or the generic stock picture
    pub fn has_generic_image(&self) -> bool {
        self.image_url.is_empty() || self.image_url == GENERIC_IMAGE_URL
    }
}

/// Join key of the merge step: lowercased, trimmed country plus year
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub country: String,
    pub year: i32,
}

impl MergeKey {
    pub fn new(country: &str, year: i32) -> Self {
        Self {
            country: country.trim().to_lowercase(),
            year,
        }
    }
}

/// Truncates a description to [`MAX_DESCRIPTION_LEN`] characters
///
/// Counts characters rather than bytes so accented text is never split
/// inside a code point.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_LEN) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_record_fills_values() {
        let record = CoinRecord::estimated("France", 2024, "Paris 2024", 5_000_000, "https://x/y.png");
        assert_eq!(record.value_fdc, 3.0);
        assert_eq!(record.value_bu, 5.0);
        assert_eq!(record.value_be, 10.0);
        assert_eq!(record.value_for(Condition::Bu), 5.0);
    }

    #[test]
    fn test_empty_description_gets_placeholder() {
        let record = CoinRecord::estimated("Malta", 2019, "   ", 100_000, GENERIC_IMAGE_URL);
        assert_eq!(record.description, "Commemorative coin 2019");
        assert!(record.has_generic_image());
    }

    #[test]
    fn test_truncate_description_counts_chars() {
        let long = "é".repeat(250);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), MAX_DESCRIPTION_LEN);

        assert_eq!(truncate_description("short"), "short");
    }

    #[test]
    fn test_merge_key_normalizes_country() {
        assert_eq!(MergeKey::new("  San Marino ", 2020), MergeKey::new("san marino", 2020));
        assert_ne!(MergeKey::new("France", 2020), MergeKey::new("France", 2021));
    }
}
