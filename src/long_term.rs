// src/long_term.rs
use crate::models::Cluster;

/// Checks if a cluster spans more days than the long-term threshold
pub fn is_long_term(cluster: &Cluster, lt_threshold: i64) -> bool {
    cluster.span > lt_threshold as f64
}
