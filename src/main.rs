// src/main.rs
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use longterm_lib::{
    config::{Args, PipelineConfig},
    pipeline, results, LongTermAnalyzer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Try to load .env file if it exists, so flags can come from the environment
    let env_paths = [".env", ".env.local", "../.env"];
    let mut loaded_env = false;

    for path in env_paths.iter() {
        if Path::new(path).exists() {
            if let Err(e) = dotenv::from_path(path) {
                warn!("Failed to load environment from {}: {}", path, e);
            } else {
                info!("Loaded environment variables from {}", path);
                loaded_env = true;
                break;
            }
        }
    }

    if !loaded_env {
        info!("No .env file found, using environment variables from system");
    }

    let config = PipelineConfig::from(Args::parse());
    info!(
        "Thresholds: lt={} days, sc_day={} days, sc_count={}",
        config.analyzer.lt_threshold,
        config.analyzer.sc_day_threshold,
        config.analyzer.sc_count_threshold
    );

    let analyzer = Arc::new(LongTermAnalyzer::new(config.analyzer));
    let stats = pipeline::run(&config, analyzer)
        .await
        .context("Long-term cluster analysis failed")?;

    results::print_report(&stats);

    Ok(())
}
