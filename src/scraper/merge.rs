//! Merge reconciler
//!
//! Joins the primary and secondary record sets on [`MergeKey`]. Primary
//! records keep their descriptive fields and take prices (and a better
//! picture) from the first pending secondary record with the same key.

use crate::coin::{CoinRecord, MergeKey};
use std::collections::{HashMap, VecDeque};

/// Merges two record sets into one
///
/// Output order: primary-derived records in primary order, then every
/// secondary record that was never matched, in secondary order.
pub fn merge(primary: Vec<CoinRecord>, secondary: Vec<CoinRecord>) -> Vec<CoinRecord> {
    let mut pending: HashMap<MergeKey, VecDeque<usize>> = HashMap::new();
    for (index, record) in secondary.iter().enumerate() {
        pending
            .entry(record.merge_key())
            .or_default()
            .push_back(index);
    }

    let mut consumed = vec![false; secondary.len()];
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());
    let mut matches = 0usize;

    for record in primary {
        let matched = pending
            .get_mut(&record.merge_key())
            .and_then(VecDeque::pop_front);

        match matched {
            Some(index) => {
                consumed[index] = true;
                matches += 1;
                merged.push(composite(record, &secondary[index]));
            }
            None => merged.push(record),
        }
    }

    let unmatched = secondary.len() - matches;
    merged.extend(
        secondary
            .into_iter()
            .zip(consumed)
            .filter(|(_, used)| !used)
            .map(|(record, _)| record),
    );

    tracing::info!(
        "Merged coin sets: {} matched, {} secondary-only, {} total",
        matches,
        unmatched,
        merged.len()
    );

    merged
}

fn composite(primary: CoinRecord, secondary: &CoinRecord) -> CoinRecord {
    let image_url = if secondary.has_generic_image() {
        primary.image_url
    } else {
        secondary.image_url.clone()
    };

    CoinRecord {
        image_url,
        value_fdc: secondary.value_fdc,
        value_bu: secondary.value_bu,
        value_be: secondary.value_be,
        ..primary
    }
}
