//! User Score - total score per user across the whole input
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin user_score -- --input events.csv --output user_scores.txt
//! ```
//!
//! ## Environment Variables
//!
//! - GAME_INPUT_PATH - Input file (default: built-in sample events)
//! - GAME_OUTPUT_PATH - Output file (required unless the backend is stdout)
//! - GAME_OUTPUT_BACKEND - text, stdout, jsonl or sqlite (default: text)
//! - GAME_OVERFLOW_POLICY - saturate or checked (default: saturate)
//! - RUST_LOG - Logging level (optional, default: info)
//!
//! See `PipelineConfig::from_env` for the full list.

use gamestats::pipeline::{run_pipeline, PipelineConfig, PipelineError, Preset};
use gamestats::scoring_core::{AtomicCounter, ParseErrorCounter};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match PipelineConfig::load(Preset::UserScore, &args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };

    log::info!("🚀 Starting User Score");
    config.log_summary();

    let parse_errors = Arc::new(AtomicCounter::parse_errors());
    let report = run_pipeline(&config, parse_errors.clone()).await?;

    log::info!("   {} = {}", parse_errors.name(), parse_errors.value());

    if !report.overflows.is_empty() {
        return Err(PipelineError::Overflow(report.overflows).into());
    }
    Ok(())
}
