use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};

mod cleaner;
mod config;
mod merge;
mod pipeline;
mod publish;
mod report;
mod summary;
mod timestamp;
mod transcript;
mod youtube;

use crate::config::Config;
use crate::pipeline::RecapPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("poker_recap=info,warn")
        .init();

    let matches = Command::new("Poker Recap Report Generator")
        .version("0.1.0")
        .about("Merges poker video summaries into a published HTML recap report")
        .arg(
            Arg::new("summaries-dir")
                .short('d')
                .long("summaries-dir")
                .value_name("DIR")
                .help("Directory containing summary JSON documents"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the rendered HTML report"),
        )
        .arg(
            Arg::new("skip-publish")
                .long("skip-publish")
                .help("Render the report but do not push it")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    if let Some(dir) = matches.get_one::<String>("summaries-dir") {
        config.input.summaries_dir = PathBuf::from(dir);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.report.output_path = PathBuf::from(output);
    }
    if matches.get_flag("skip-publish") {
        config.publish.enabled = false;
    }
    if matches.get_flag("verbose") {
        info!("Verbose logging enabled");
    }

    config.validate()?;

    info!("🚀 Poker Recap Report Generator starting...");
    info!("📁 Summaries directory: {}", config.input.summaries_dir.display());
    info!("📂 Report output: {}", config.report.output_path.display());

    let pipeline = RecapPipeline::new(config);
    let result = pipeline.run().await?;

    info!("🎉 Run completed in {:.2}s", result.total_time.as_secs_f64());
    info!("📄 Documents ingested: {}", result.total_documents);
    info!("✅ Videos in report: {}", result.merged_videos);
    if !result.excluded.is_empty() {
        warn!("⚠️ Excluded videos: {}", result.excluded.join(", "));
    }
    info!("📝 Report: {}", result.report_path.display());

    Ok(())
}
