// src/models.rs

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::parse_hit_date;
use crate::errors::{AnalysisError, Result};

//------------------------------------------------------------------------------
// IDENTIFIER TYPES
//------------------------------------------------------------------------------

/// Name of the corpus file a cluster was read from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile(pub String);

/// Key of a cluster within its source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterKey(pub String);

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//------------------------------------------------------------------------------
// CORPUS RECORDS
//------------------------------------------------------------------------------

/// One dated occurrence inside a reuse cluster.
///
/// Only the date takes part in the analysis; the rest of the hit stays in
/// the cluster's raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub date: NaiveDateTime,
}

/// A reuse cluster: a group of hits believed to repeat the same item
#[derive(Debug, Clone)]
pub struct Cluster {
    pub key: ClusterKey,

    /// Days between first and last hit, as supplied upstream
    pub span: f64,

    /// Hits, expected in ascending date order
    pub hits: Vec<Hit>,

    /// The unmodified record this cluster was built from
    pub data: Value,
}

impl Cluster {
    /// Validates a raw cluster record and extracts the fields the analysis needs
    pub fn from_record(key: &str, record: Value) -> Result<Self> {
        let invalid = |field: &'static str, reason: &str| AnalysisError::InvalidField {
            cluster: key.to_string(),
            field,
            reason: reason.to_string(),
        };
        let missing = |field: &'static str| AnalysisError::MissingField {
            cluster: key.to_string(),
            field,
        };

        let obj = record
            .as_object()
            .ok_or_else(|| invalid("record", "expected a JSON object"))?;

        let span = obj
            .get("span")
            .ok_or_else(|| missing("span"))?
            .as_f64()
            .ok_or_else(|| invalid("span", "expected a number"))?;

        let raw_hits = obj
            .get("hits")
            .ok_or_else(|| missing("hits"))?
            .as_array()
            .ok_or_else(|| invalid("hits", "expected an array"))?;

        let mut hits = Vec::with_capacity(raw_hits.len());
        for raw_hit in raw_hits {
            let hit_obj = raw_hit
                .as_object()
                .ok_or_else(|| invalid("hits", "each hit must be a JSON object"))?;
            let date_str = hit_obj
                .get("date")
                .ok_or_else(|| missing("date"))?
                .as_str()
                .ok_or_else(|| invalid("date", "expected a string"))?;
            let date = parse_hit_date(date_str).ok_or_else(|| AnalysisError::DateParse {
                cluster: key.to_string(),
                value: date_str.to_string(),
            })?;
            hits.push(Hit { date });
        }

        Ok(Cluster {
            key: ClusterKey(key.to_string()),
            span,
            hits,
            data: record,
        })
    }

    /// True if hit dates never decrease with index
    pub fn is_chronological(&self) -> bool {
        self.hits.windows(2).all(|w| w[0].date <= w[1].date)
    }
}

/// All clusters read from one corpus file, in file order
#[derive(Debug, Clone)]
pub struct CorpusFile {
    pub name: SourceFile,
    pub clusters: Vec<Cluster>,
}

pub(crate) fn hit_at(hits: &[Hit], index: usize) -> Result<&Hit> {
    hits.get(index).ok_or(AnalysisError::HitIndexOutOfRange {
        index,
        len: hits.len(),
    })
}

//------------------------------------------------------------------------------
// DERIVED VIEWS
//------------------------------------------------------------------------------

/// Two hit indices `i < j` whose dates are within the proximity threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPair {
    pub i: usize,
    pub j: usize,
}

impl IndexPair {
    pub fn new(i: usize, j: usize) -> Self {
        debug_assert!(i < j, "IndexPair requires i < j, got ({}, {})", i, j);
        IndexPair { i, j }
    }
}

/// A connected group of hit indices; sorted, deduplicated, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubCluster(Vec<usize>);

impl SubCluster {
    /// Sorts and deduplicates the indices. Returns `None` when empty.
    pub fn from_indices(mut indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }
        indices.sort_unstable();
        indices.dedup();
        Some(SubCluster(indices))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn first(&self) -> usize {
        self.0[0]
    }

    pub fn last(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Dates of the member hits, in index order
    pub fn dates(&self, hits: &[Hit]) -> Result<Vec<NaiveDateTime>> {
        self.0
            .iter()
            .map(|&idx| hit_at(hits, idx).map(|h| h.date))
            .collect()
    }
}

/// Year-gap statistics between the sub-clusters of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapStats {
    pub min: i32,
    pub mean: f64,
    pub median: f64,
    pub max: i32,
}

/// A cluster accepted as long-term and multi-phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub source_file: SourceFile,
    pub cluster_key: ClusterKey,
    pub cluster_data: Value,
}
