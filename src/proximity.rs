// src/proximity.rs
use crate::dates::day_gap;
use crate::models::{Hit, IndexPair};

/// Finds every pair of hits whose dates are at most `day_threshold` days apart.
///
/// Hits must be in ascending date order: the inner sweep for `i` stops at the
/// first `j` that is too far away, so later close hits would be missed if the
/// order were broken.
pub fn scan_pairs(hits: &[Hit], day_threshold: i64) -> Vec<IndexPair> {
    let mut pairs = Vec::new();

    for (i, current) in hits.iter().enumerate() {
        for (offset, candidate) in hits[i + 1..].iter().enumerate() {
            if day_gap(current.date, candidate.date) > day_threshold {
                break;
            }
            pairs.push(IndexPair::new(i, i + 1 + offset));
        }
    }

    pairs
}
