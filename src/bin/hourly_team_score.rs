//! Hourly Team Score - total score per team in fixed event-time windows
//!
//! Events at or before the lower time bound are dropped first: a day's
//! batch can carry late events from the previous day, and counting them
//! here would count them twice once that day is processed too.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin hourly_team_score -- --input events.csv
//! ```
//!
//! ## Environment Variables
//!
//! - GAME_INPUT_PATH - Input file (default: built-in sample events)
//! - GAME_OUTPUT_BACKEND - text, stdout, jsonl or sqlite (default: stdout)
//! - GAME_MIN_TIMESTAMP_MS - Exclusive lower bound (default: 1)
//! - GAME_MAX_TIMESTAMP_MS - Exclusive upper bound (default: none)
//! - GAME_WINDOW - Window size in milliseconds (default: 60000)
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
    let config = match PipelineConfig::load(Preset::HourlyTeamScore, &args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };

    log::info!("🚀 Starting Hourly Team Score");
    config.log_summary();

    let parse_errors = Arc::new(AtomicCounter::parse_errors());
    let report = run_pipeline(&config, parse_errors.clone()).await?;

    log::info!("   {} = {}", parse_errors.name(), parse_errors.value());

    if !report.overflows.is_empty() {
        return Err(PipelineError::Overflow(report.overflows).into());
    }
    Ok(())
}
