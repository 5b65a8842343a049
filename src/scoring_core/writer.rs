//! Unified result writer
//!
//! Routes writes to the text, stdout, JSONL or SQLite backend based on configuration.

use super::aggregate::AggregateResult;
use super::jsonl_sink::JsonlResultSink;
use super::sink::{ResultSink, SinkError};
use super::sqlite_sink::SqliteResultSink;
use super::text_sink::{StdoutSink, TextFileSink};
use crate::pipeline::config::{BackendType, ConfigError};
use std::path::PathBuf;

#[derive(Debug)]
pub enum WriterInitError {
    Config(ConfigError),
    Sink(SinkError),
}

impl From<ConfigError> for WriterInitError {
    fn from(err: ConfigError) -> Self {
        WriterInitError::Config(err)
    }
}

impl From<SinkError> for WriterInitError {
    fn from(err: SinkError) -> Self {
        WriterInitError::Sink(err)
    }
}

impl From<std::io::Error> for WriterInitError {
    fn from(err: std::io::Error) -> Self {
        WriterInitError::Sink(SinkError::Io(err))
    }
}

impl std::fmt::Display for WriterInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterInitError::Config(e) => write!(f, "{}", e),
            WriterInitError::Sink(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WriterInitError {}

pub enum ResultWriter {
    Text(TextFileSink),
    Stdout(StdoutSink),
    Jsonl(JsonlResultSink),
    Sqlite(SqliteResultSink),
}

impl ResultWriter {
    /// Create a writer for the configured backend. Every backend except
    /// stdout needs an output path.
    pub fn new(backend: BackendType, output_path: Option<PathBuf>) -> Result<Self, WriterInitError> {
        if backend == BackendType::Stdout {
            return Ok(ResultWriter::Stdout(StdoutSink::new()));
        }

        let path = output_path.ok_or_else(|| ConfigError::MissingVariable("GAME_OUTPUT_PATH".to_string()))?;
        let writer = match backend {
            BackendType::Text => ResultWriter::Text(TextFileSink::new(&path)?),
            BackendType::Jsonl => ResultWriter::Jsonl(JsonlResultSink::new(&path)?),
            BackendType::Sqlite => ResultWriter::Sqlite(SqliteResultSink::new(&path)?),
            BackendType::Stdout => ResultWriter::Stdout(StdoutSink::new()),
        };
        Ok(writer)
    }

    fn sink(&mut self) -> &mut dyn ResultSink {
        match self {
            ResultWriter::Text(w) => w,
            ResultWriter::Stdout(w) => w,
            ResultWriter::Jsonl(w) => w,
            ResultWriter::Sqlite(w) => w,
        }
    }

    pub async fn write_result(&mut self, result: &AggregateResult, line: &str) -> Result<(), SinkError> {
        self.sink().write_result(result, line).await
    }

    pub async fn flush(&mut self) -> Result<(), SinkError> {
        self.sink().flush().await
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            ResultWriter::Text(w) => w.backend_type(),
            ResultWriter::Stdout(w) => w.backend_type(),
            ResultWriter::Jsonl(w) => w.backend_type(),
            ResultWriter::Sqlite(w) => w.backend_type(),
        }
    }
}
