// src/errors.rs

use std::path::PathBuf;

/// Errors raised while validating and analyzing cluster records
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Cluster {cluster}: missing field '{field}'")]
    MissingField { cluster: String, field: &'static str },

    #[error("Cluster {cluster}: invalid field '{field}': {reason}")]
    InvalidField {
        cluster: String,
        field: &'static str,
        reason: String,
    },

    #[error("Cluster {cluster}: cannot parse date '{value}'")]
    DateParse { cluster: String, value: String },

    #[error("Hit index {index} out of range for cluster with {len} hits")]
    HitIndexOutOfRange { index: usize, len: usize },

    #[error("Gap statistics need at least 2 sub-clusters, got {sub_clusters}")]
    EmptyStatistics { sub_clusters: usize },

    #[error("Invalid cluster file {path}: {reason}")]
    InvalidCorpus { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
