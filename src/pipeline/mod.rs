//! # Scoring Pipeline
//!
//! Wires the scoring core into a runnable batch job:
//! 1. `config` - presets, environment overrides, command-line flags, validation
//! 2. `engine` - the per-line stage chain feeding a partial `ScoreTable`
//! 3. `ingestion` - input loading, partitioned aggregation, result emission
//!
//! Configuration is validated in full before any input is read.

pub mod config;
pub mod engine;
pub mod ingestion;

pub use config::{BackendType, ConfigError, PipelineConfig, Preset};
pub use engine::{RunStats, ScoringEngine};
pub use ingestion::{aggregate_partitioned, run_pipeline, PipelineError, RunReport};
