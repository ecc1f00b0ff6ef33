// src/results.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::analyzer::FileSummary;
use crate::config::AnalyzerConfig;
use crate::models::AnalysisResult;

/// Statistics for one analysis run over a corpus
#[derive(Debug, Clone)]
pub struct RunStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub config: AnalyzerConfig,

    pub files_processed: usize,
    pub clusters_scanned: usize,
    /// Clusters whose span passed the long-term threshold
    pub long_term_clusters: usize,
    /// Clusters that also had enough sub-clusters
    pub accepted_clusters: usize,

    pub elapsed_secs: f64,
}

impl RunStats {
    pub fn new(config: AnalyzerConfig) -> Self {
        RunStats {
            run_id: Uuid::new_v4().to_string(),
            run_timestamp: Utc::now().naive_utc(),
            config,
            files_processed: 0,
            clusters_scanned: 0,
            long_term_clusters: 0,
            accepted_clusters: 0,
            elapsed_secs: 0.0,
        }
    }

    pub fn record_file(&mut self, summary: &FileSummary) {
        self.files_processed += 1;
        self.clusters_scanned += summary.clusters_scanned;
        self.long_term_clusters += summary.long_term_clusters;
        self.accepted_clusters += summary.accepted_clusters;
    }
}

/// Writes the accepted clusters as a JSON array.
///
/// Data goes to a sibling temp file first and is renamed over `path` once
/// complete, so a failed run never leaves a truncated output behind.
pub fn write_results(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let file = File::create(tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, results).context("Failed to serialize results")?;
    writer.flush().context("Failed to flush results")?;
    drop(writer);

    fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to move results into {}", path.display()))?;

    info!("Wrote {} clusters to {}", results.len(), path.display());
    Ok(())
}

/// Reads back a result file written by [`write_results`]
pub fn read_results(path: &Path) -> Result<Vec<AnalysisResult>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse results in {}", path.display()))
}

pub fn print_report(stats: &RunStats) {
    println!("\n========== LONG-TERM CLUSTER ANALYSIS REPORT ==========");
    println!("Run ID: {}", stats.run_id);
    println!("Timestamp: {}", stats.run_timestamp);

    println!("\n--- THRESHOLDS ---");
    println!("Long-term span (days, exclusive): {}", stats.config.lt_threshold);
    println!("Sub-cluster day gap (days, inclusive): {}", stats.config.sc_day_threshold);
    println!(
        "Sub-cluster count (exclusive): {}",
        stats.config.sc_count_threshold
    );

    println!("\n--- GENERAL STATISTICS ---");
    println!("Files processed: {}", stats.files_processed);
    println!("Clusters scanned: {}", stats.clusters_scanned);
    println!("Long-term clusters: {}", stats.long_term_clusters);
    println!("Accepted multi-phase clusters: {}", stats.accepted_clusters);

    println!("\n--- TIMING INFORMATION ---");
    println!("Total processing time: {:.2} seconds", stats.elapsed_secs);
    println!("=======================================================\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClusterKey, SourceFile};
    use serde_json::json;

    #[test]
    fn test_record_file_accumulates() {
        let mut stats = RunStats::new(AnalyzerConfig::default());
        stats.record_file(&FileSummary {
            clusters_scanned: 5,
            long_term_clusters: 3,
            accepted_clusters: 1,
        });
        stats.record_file(&FileSummary {
            clusters_scanned: 2,
            long_term_clusters: 2,
            accepted_clusters: 2,
        });
        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.clusters_scanned, 7);
        assert_eq!(stats.long_term_clusters, 5);
        assert_eq!(stats.accepted_clusters, 3);
        assert!(!stats.run_id.is_empty());
    }

    #[test]
    fn test_write_and_read_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("clusters.json");
        let results = vec![AnalysisResult {
            source_file: SourceFile("a.json.gz".to_string()),
            cluster_key: ClusterKey("42".to_string()),
            cluster_data: json!({"span": 100, "hits": [{"date": "2000-01-01", "text": "x"}]}),
        }];

        write_results(&path, &results).unwrap();
        assert!(!dir.path().join("out").join("clusters.json.tmp").exists());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["source_file"], "a.json.gz");
        assert_eq!(raw[0]["cluster_key"], "42");
        assert_eq!(raw[0]["cluster_data"]["hits"][0]["text"], "x");

        assert_eq!(read_results(&path).unwrap(), results);
    }
}
