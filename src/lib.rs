// src/lib.rs
pub mod analyzer;
pub mod config;
pub mod corpus;
pub mod dates;
pub mod disjoint_clusters;
pub mod errors;
pub mod gap_stats;
pub mod long_term;
pub mod models;
pub mod pipeline;
pub mod proximity;
pub mod results;

// Re-export common types for easier access
pub use models::{
    AnalysisResult, Cluster, ClusterKey, CorpusFile, GapStats, Hit, IndexPair, SourceFile,
    SubCluster,
};

pub use analyzer::{ClusterAnalysis, LongTermAnalyzer};
pub use config::{AnalyzerConfig, PipelineConfig};
pub use errors::AnalysisError;
