// src/config.rs
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

// Minimum span in days (exclusive) for a cluster to count as long-term
pub const DEFAULT_LT_THRESHOLD: i64 = 10;

// Maximum day gap for two hits to be considered close
pub const DEFAULT_SC_DAY_THRESHOLD: i64 = 10;

// Minimum number of sub-clusters (exclusive) for a cluster to be kept
pub const DEFAULT_SC_COUNT_THRESHOLD: usize = 2;

pub const DEFAULT_OUTPUT_PATH: &str = "clusters.json";
pub const DEFAULT_CONCURRENT_FILES: usize = 4;

/// Thresholds driving the per-cluster analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub lt_threshold: i64,
    pub sc_day_threshold: i64,
    pub sc_count_threshold: usize,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sc_day_threshold < 0 {
            bail!(
                "sc_day_threshold must be non-negative, got {}",
                self.sc_day_threshold
            );
        }
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            lt_threshold: DEFAULT_LT_THRESHOLD,
            sc_day_threshold: DEFAULT_SC_DAY_THRESHOLD,
            sc_count_threshold: DEFAULT_SC_COUNT_THRESHOLD,
        }
    }
}

/// Everything a full corpus run needs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub cluster_location: PathBuf,
    pub output_path: PathBuf,
    pub concurrent_files: usize,
    pub show_progress: bool,
    pub analyzer: AnalyzerConfig,
}

impl PipelineConfig {
    pub fn new(cluster_location: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            cluster_location: cluster_location.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            concurrent_files: DEFAULT_CONCURRENT_FILES,
            show_progress: true,
            analyzer: AnalyzerConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analyzer.validate()?;
        if self.concurrent_files == 0 {
            bail!("at least one file must be processed at a time");
        }
        Ok(())
    }
}

/// Find long term reuse clusters that contain many smaller clusters
#[derive(Debug, Parser)]
#[command(name = "longterm", version, about)]
pub struct Args {
    /// Folder holding the (gzipped) JSON cluster files
    #[arg(long, env = "LONGTERM_CLUSTER_LOCATION")]
    pub cluster_location: PathBuf,

    /// Minimum cluster span in days, exclusive
    #[arg(long, env = "LONGTERM_LT_THRESHOLD", default_value_t = DEFAULT_LT_THRESHOLD)]
    pub lt_threshold: i64,

    /// Maximum day gap between two hits of the same sub-cluster
    #[arg(long, env = "LONGTERM_SC_DAY_THRESHOLD", default_value_t = DEFAULT_SC_DAY_THRESHOLD)]
    pub sc_day_threshold: i64,

    /// Minimum number of sub-clusters, exclusive
    #[arg(long, env = "LONGTERM_SC_COUNT_THRESHOLD", default_value_t = DEFAULT_SC_COUNT_THRESHOLD)]
    pub sc_count_threshold: usize,

    /// Where to write the accepted clusters
    #[arg(long, env = "LONGTERM_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Number of cluster files analyzed concurrently
    #[arg(long, env = "LONGTERM_JOBS", default_value_t = DEFAULT_CONCURRENT_FILES)]
    pub jobs: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        PipelineConfig {
            cluster_location: args.cluster_location,
            output_path: args.output,
            concurrent_files: args.jobs,
            show_progress: !args.no_progress,
            analyzer: AnalyzerConfig {
                lt_threshold: args.lt_threshold,
                sc_day_threshold: args.sc_day_threshold,
                sc_count_threshold: args.sc_count_threshold,
            },
        }
    }
}
