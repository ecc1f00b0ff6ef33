// src/pipeline.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::analyzer::{FileSummary, LongTermAnalyzer};
use crate::config::PipelineConfig;
use crate::corpus::{list_cluster_files, read_cluster_file};
use crate::models::AnalysisResult;
use crate::results::{write_results, RunStats};

/// Runs the analysis over every file in the cluster folder.
///
/// Up to `concurrent_files` files are read and analyzed at once on the
/// blocking pool, but results are collected in file order. The first error
/// aborts the run and nothing is written.
pub async fn run(config: &PipelineConfig, analyzer: Arc<LongTermAnalyzer>) -> Result<RunStats> {
    config.validate()?;
    // The analyzer may have been built from different thresholds than `config.analyzer`
    analyzer
        .config()
        .validate()
        .context("Invalid analyzer thresholds")?;
    let start_time = Instant::now();
    let mut stats = RunStats::new(*analyzer.config());

    info!(
        "Starting long-term cluster analysis (run ID: {}) in {}",
        stats.run_id,
        config.cluster_location.display()
    );

    let files = list_cluster_files(&config.cluster_location).with_context(|| {
        format!(
            "Failed to list cluster files in {}",
            config.cluster_location.display()
        )
    })?;
    info!("Found {} cluster files", files.len());

    let progress = progress_bar(files.len() as u64, config.show_progress)?;

    let mut analyzed = stream::iter(files)
        .map(|path| {
            let analyzer = Arc::clone(&analyzer);
            tokio::task::spawn_blocking(move || analyze_path(&analyzer, path))
        })
        .buffered(config.concurrent_files);

    let mut clusters: Vec<AnalysisResult> = Vec::new();
    while let Some(joined) = analyzed.next().await {
        let (path, results, summary) = joined.context("Cluster file worker panicked")??;
        debug!(
            "{}: {} clusters, {} long-term, {} accepted",
            path.display(),
            summary.clusters_scanned,
            summary.long_term_clusters,
            summary.accepted_clusters
        );
        stats.record_file(&summary);
        clusters.extend(results);
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(
        "Scanned {} clusters in {} files: {} long-term, {} accepted",
        stats.clusters_scanned,
        stats.files_processed,
        stats.long_term_clusters,
        stats.accepted_clusters
    );

    write_results(&config.output_path, &clusters)?;
    analyzer.visualize(&clusters);

    stats.elapsed_secs = start_time.elapsed().as_secs_f64();
    info!("Analysis finished in {:.2?}", start_time.elapsed());
    Ok(stats)
}

fn analyze_path(
    analyzer: &LongTermAnalyzer,
    path: PathBuf,
) -> Result<(PathBuf, Vec<AnalysisResult>, FileSummary)> {
    let corpus_file = read_cluster_file(&path)
        .with_context(|| format!("Failed to read cluster file {}", path.display()))?;
    let (results, summary) = analyzer
        .analyze_file(&corpus_file)
        .with_context(|| format!("Failed to analyze clusters in {}", display_name(&path)))?;
    Ok((path, results, summary))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn progress_bar(len: u64, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")?,
    );
    bar.set_message("Finding clusters...");
    Ok(bar)
}
