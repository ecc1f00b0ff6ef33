// src/analyzer.rs
use std::borrow::Cow;
use std::fmt;

use log::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::disjoint_clusters::extract_disjoint_clusters;
use crate::errors::Result;
use crate::gap_stats::calculate_gap_values;
use crate::long_term::is_long_term;
use crate::models::{AnalysisResult, Cluster, ClusterKey, CorpusFile, GapStats, Hit, SubCluster};
use crate::proximity::scan_pairs;

/// Callback run on the final result list
pub type Visualizer = Box<dyn Fn(&[AnalysisResult]) + Send + Sync>;

/// Details for a cluster that passed both filters
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAnalysis {
    pub key: ClusterKey,
    pub pair_count: usize,
    pub sub_clusters: Vec<SubCluster>,
    pub gap_stats: GapStats,
}

/// Counters for one batch of analyzed clusters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSummary {
    pub clusters_scanned: usize,
    pub long_term_clusters: usize,
    pub accepted_clusters: usize,
}

/// Finds long term clusters that contain many smaller clusters
pub struct LongTermAnalyzer {
    config: AnalyzerConfig,
    visualizer: Option<Visualizer>,
}

impl fmt::Debug for LongTermAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongTermAnalyzer")
            .field("config", &self.config)
            .field("visualizer", &self.visualizer.is_some())
            .finish()
    }
}

impl LongTermAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        LongTermAnalyzer {
            config,
            visualizer: None,
        }
    }

    pub fn with_visualizer(mut self, visualizer: Visualizer) -> Self {
        self.visualizer = Some(visualizer);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Splits a cluster's hits into sub-clusters of close hits, ordered by first index
    pub fn get_smaller_clusters(&self, hits: &[Hit]) -> (usize, Vec<SubCluster>) {
        let pairs = scan_pairs(hits, self.config.sc_day_threshold);
        (pairs.len(), extract_disjoint_clusters(&pairs))
    }

    /// Runs both filters on one cluster.
    ///
    /// Returns `Ok(None)` when the cluster is not long-term or does not have
    /// more sub-clusters than the count threshold.
    pub fn analyze_cluster(&self, cluster: &Cluster) -> Result<Option<ClusterAnalysis>> {
        if !is_long_term(cluster, self.config.lt_threshold) {
            return Ok(None);
        }

        let hits = chronological_hits(cluster);
        let (pair_count, sub_clusters) = self.get_smaller_clusters(&hits);
        if sub_clusters.len() <= self.config.sc_count_threshold {
            debug!(
                "Cluster {} has {} sub-clusters, needs more than {}",
                cluster.key,
                sub_clusters.len(),
                self.config.sc_count_threshold
            );
            return Ok(None);
        }

        // Fails with EmptyStatistics when a zero count threshold lets a single
        // sub-cluster through; the run aborts on it
        let gap_stats = calculate_gap_values(&sub_clusters, &hits)?;
        debug!(
            "Cluster {}: {} pairs, {} sub-clusters, gaps min={} mean={:.2} median={} max={}",
            cluster.key,
            pair_count,
            sub_clusters.len(),
            gap_stats.min,
            gap_stats.mean,
            gap_stats.median,
            gap_stats.max
        );
        if log::log_enabled!(log::Level::Debug) {
            for (n, sub_cluster) in sub_clusters.iter().enumerate() {
                let dates = sub_cluster.dates(&hits)?;
                if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
                    debug!(
                        "Cluster {} phase {}: {} hits from {} to {}",
                        cluster.key,
                        n + 1,
                        dates.len(),
                        first.date(),
                        last.date()
                    );
                }
            }
        }

        Ok(Some(ClusterAnalysis {
            key: cluster.key.clone(),
            pair_count,
            sub_clusters,
            gap_stats,
        }))
    }

    /// Analyzes every cluster of one file, keeping the file's key order
    pub fn analyze_file(&self, file: &CorpusFile) -> Result<(Vec<AnalysisResult>, FileSummary)> {
        let mut results = Vec::new();
        let mut summary = FileSummary::default();

        for cluster in &file.clusters {
            summary.clusters_scanned += 1;
            if is_long_term(cluster, self.config.lt_threshold) {
                summary.long_term_clusters += 1;
            }
            if self.analyze_cluster(cluster)?.is_some() {
                summary.accepted_clusters += 1;
                results.push(AnalysisResult {
                    source_file: file.name.clone(),
                    cluster_key: cluster.key.clone(),
                    cluster_data: cluster.data.clone(),
                });
            }
        }

        Ok((results, summary))
    }

    /// Analyzes a whole corpus in order, stopping at the first error
    pub fn find_clusters<I>(&self, corpus: I) -> Result<Vec<AnalysisResult>>
    where
        I: IntoIterator<Item = Result<CorpusFile>>,
    {
        let mut clusters = Vec::new();
        for file in corpus {
            let (results, _) = self.analyze_file(&file?)?;
            clusters.extend(results);
        }
        Ok(clusters)
    }

    /// Hands the results to the installed visualizer, if any
    pub fn visualize(&self, results: &[AnalysisResult]) {
        if let Some(visualizer) = &self.visualizer {
            visualizer(results);
        }
    }
}

fn chronological_hits(cluster: &Cluster) -> Cow<'_, [Hit]> {
    if cluster.is_chronological() {
        return Cow::Borrowed(&cluster.hits);
    }
    warn!(
        "Cluster {} has hits out of date order; analyzing a sorted copy",
        cluster.key
    );
    let mut sorted = cluster.hits.clone();
    sorted.sort_by_key(|h| h.date);
    Cow::Owned(sorted)
}
