// src/gap_stats.rs
use chrono::Datelike;

use crate::errors::{AnalysisError, Result};
use crate::models::{hit_at, GapStats, Hit, SubCluster};

/// Calculates min, mean, median and max year gaps between sub-clusters.
///
/// Every ordered pair (A, B) with A before B contributes
/// `year(first hit of B) - year(last hit of A)`, so `k` sub-clusters give
/// `k * (k - 1) / 2` gaps. The caller must pass the sub-clusters ordered by
/// their first index; they are not re-sorted here.
pub fn calculate_gap_values(sub_clusters: &[SubCluster], hits: &[Hit]) -> Result<GapStats> {
    if sub_clusters.len() < 2 {
        return Err(AnalysisError::EmptyStatistics {
            sub_clusters: sub_clusters.len(),
        });
    }

    let mut gaps = Vec::with_capacity(sub_clusters.len() * (sub_clusters.len() - 1) / 2);
    for (i, earlier) in sub_clusters.iter().enumerate() {
        let end_year = hit_at(hits, earlier.last())?.date.year();
        for later in &sub_clusters[i + 1..] {
            let start_year = hit_at(hits, later.first())?.date.year();
            gaps.push(start_year - end_year);
        }
    }

    Ok(summarize(gaps))
}

fn summarize(mut gaps: Vec<i32>) -> GapStats {
    gaps.sort_unstable();
    let n = gaps.len();
    let mean = gaps.iter().map(|&g| g as f64).sum::<f64>() / n as f64;
    let mid = n / 2;
    let median = if n % 2 == 0 {
        (gaps[mid - 1] as f64 + gaps[mid] as f64) / 2.0
    } else {
        gaps[mid] as f64
    };

    GapStats {
        min: gaps[0],
        mean,
        median,
        max: gaps[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_hit_date;

    fn hits(dates: &[&str]) -> Vec<Hit> {
        dates
            .iter()
            .map(|d| Hit {
                date: parse_hit_date(d).unwrap(),
            })
            .collect()
    }

    fn sc(indices: &[usize]) -> SubCluster {
        SubCluster::from_indices(indices.to_vec()).unwrap()
    }

    #[test]
    fn test_single_gap() {
        let h = hits(&["2000-01-01", "2000-01-05", "2005-06-01", "2005-06-03"]);
        let stats = calculate_gap_values(&[sc(&[0, 1]), sc(&[2, 3])], &h).unwrap();
        assert_eq!(
            stats,
            GapStats {
                min: 5,
                mean: 5.0,
                median: 5.0,
                max: 5
            }
        );
    }

    #[test]
    fn test_calendar_year_subtraction() {
        // Two days apart but across a year boundary
        let h = hits(&["1999-12-30", "1999-12-31", "2000-01-01", "2000-01-02"]);
        let stats = calculate_gap_values(&[sc(&[0, 1]), sc(&[2, 3])], &h).unwrap();
        assert_eq!((stats.min, stats.max), (1, 1));
    }

    #[test]
    fn test_all_pairs_of_sub_clusters() {
        let h = hits(&[
            "1800-01-01",
            "1800-01-02",
            "1803-01-01",
            "1803-01-02",
            "1810-01-01",
            "1810-01-02",
        ]);
        let stats =
            calculate_gap_values(&[sc(&[0, 1]), sc(&[2, 3]), sc(&[4, 5])], &h).unwrap();
        // gaps: 3, 10, 7
        assert_eq!(stats.min, 3);
        assert_eq!(stats.max, 10);
        assert!((stats.mean - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.median, 7.0);
        assert!(stats.min as f64 <= stats.mean && stats.mean <= stats.max as f64);
    }

    #[test]
    fn test_even_gap_count_averages_middle_values() {
        let h = hits(&[
            "1900-01-01",
            "1900-01-02",
            "1901-01-01",
            "1901-01-02",
            "1904-01-01",
            "1904-01-02",
            "1910-01-01",
            "1910-01-02",
        ]);
        let subs = [sc(&[0, 1]), sc(&[2, 3]), sc(&[4, 5]), sc(&[6, 7])];
        let stats = calculate_gap_values(&subs, &h).unwrap();
        // gaps: 1, 4, 10, 3, 9, 6 -> sorted 1, 3, 4, 6, 9, 10
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 10);
        assert_eq!(stats.median, 5.0);
        assert!((stats.mean - 33.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_than_two_sub_clusters() {
        let h = hits(&["2000-01-01", "2000-01-02"]);
        let err = calculate_gap_values(&[sc(&[0, 1])], &h).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyStatistics { sub_clusters: 1 }));
        let err = calculate_gap_values(&[], &h).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyStatistics { sub_clusters: 0 }));
    }

    #[test]
    fn test_index_out_of_range() {
        let h = hits(&["2000-01-01", "2000-01-02"]);
        let err = calculate_gap_values(&[sc(&[0, 1]), sc(&[5, 6])], &h).unwrap_err();
        assert!(matches!(err, AnalysisError::HitIndexOutOfRange { index: 5, len: 2 }));
    }
}
