//! Pipeline ingestion - partitioned aggregation and result emission
//!
//! Input lines are split into partitions, each partition is aggregated into
//! its own `ScoreTable` on a blocking worker, and the partial tables are
//! merged. Because score sums combine in any order, the merged table is the
//! same as a single sequential pass.

use super::config::{ConfigError, PipelineConfig};
use super::engine::{RunStats, ScoringEngine};
use crate::scoring_core::reader::{sample_lines, LineReader};
use crate::scoring_core::writer::{ResultWriter, WriterInitError};
use crate::scoring_core::{OverflowError, ParseErrorCounter, ScoreTable, SinkError, Totals};
use std::sync::Arc;

#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Io(std::io::Error),
    Sink(SinkError),
    Task(tokio::task::JoinError),
    Overflow(Vec<OverflowError>),
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<SinkError> for PipelineError {
    fn from(err: SinkError) -> Self {
        PipelineError::Sink(err)
    }
}

impl From<WriterInitError> for PipelineError {
    fn from(err: WriterInitError) -> Self {
        match err {
            WriterInitError::Config(e) => PipelineError::Config(e),
            WriterInitError::Sink(e) => PipelineError::Sink(e),
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Task(err)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "{}", e),
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::Sink(e) => write!(f, "Output error: {}", e),
            PipelineError::Task(e) => write!(f, "Worker task failed: {}", e),
            PipelineError::Overflow(errs) => {
                write!(f, "{} group total(s) exceeded the 64-bit range", errs.len())
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Outcome of a complete run
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    pub results_written: u64,
    pub overflows: Vec<OverflowError>,
}

/// Aggregate `lines` across `partitions` workers and merge the partial tables
pub async fn aggregate_partitioned(
    engine: Arc<ScoringEngine>,
    lines: Vec<String>,
    partitions: usize,
) -> Result<(ScoreTable, RunStats), PipelineError> {
    let partitions = partitions.max(1);
    let chunk_size = lines.len().div_ceil(partitions).max(1);

    let mut handles = Vec::with_capacity(partitions);
    let mut remaining = lines;
    while !remaining.is_empty() {
        let rest = remaining.split_off(chunk_size.min(remaining.len()));
        let chunk = std::mem::replace(&mut remaining, rest);
        let engine = engine.clone();
        handles.push(tokio::task::spawn_blocking(move || engine.aggregate(chunk)));
    }
    log::debug!("Spawned {} partition workers", handles.len());

    let mut table = engine.new_table();
    let mut stats = RunStats::default();
    for handle in handles {
        let (partial, partial_stats) = handle.await?;
        table.merge(partial);
        stats.merge(&partial_stats);
    }

    Ok((table, stats))
}

/// Read the configured input, or the sample events when none is set
pub async fn load_lines(config: &PipelineConfig) -> Result<Vec<String>, PipelineError> {
    match &config.input_path {
        Some(path) => {
            let mut reader = LineReader::new(path.clone());
            Ok(reader.read_all().await?)
        }
        None => {
            log::info!("📖 No input configured, using built-in sample events");
            Ok(sample_lines())
        }
    }
}

pub async fn write_results(
    engine: &ScoringEngine,
    totals: &Totals,
    writer: &mut ResultWriter,
) -> Result<u64, PipelineError> {
    let mut written = 0;
    for result in &totals.results {
        let line = engine.format(result);
        writer.write_result(result, &line).await?;
        written += 1;
    }
    writer.flush().await?;
    Ok(written)
}

/// Run the whole pipeline: validate, read, aggregate, write.
///
/// Configuration errors surface before the input is touched, and an input
/// error leaves any existing output untouched. Groups that
/// overflow under the `checked` policy are reported in the returned
/// `RunReport` and never written.
pub async fn run_pipeline(
    config: &PipelineConfig,
    errors: Arc<dyn ParseErrorCounter>,
) -> Result<RunReport, PipelineError> {
    let engine = Arc::new(ScoringEngine::new(config, errors)?);

    let lines = load_lines(config).await?;
    let (table, stats) = aggregate_partitioned(engine.clone(), lines, config.partitions).await?;
    let totals = engine.finish(table);

    // the output is opened (and truncated) only once the input has been read
    let mut writer = ResultWriter::new(config.backend, config.output_path.clone())?;
    log::info!("📊 Backend: {}", writer.backend_type());
    let results_written = write_results(&engine, &totals, &mut writer).await?;

    log::info!(
        "✅ Processed {} lines: {} events parsed, {} parse errors, {} outside time bounds, {} results written",
        stats.lines_read,
        stats.events_parsed,
        stats.parse_errors,
        stats.events_filtered,
        results_written
    );

    Ok(RunReport {
        stats,
        results_written,
        overflows: totals.overflows,
    })
}
