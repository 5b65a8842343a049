//! Plain-text sinks: one formatted result per line

use super::aggregate::AggregateResult;
use super::sink::{ResultSink, SinkError};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct TextFileSink {
    writer: BufWriter<std::fs::File>,
    lines_written: u64,
}

impl TextFileSink {
    /// Creates (or truncates) the output file
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        log::info!("📝 Writing results to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            lines_written: 0,
        })
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

impl Drop for TextFileSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[async_trait]
impl ResultSink for TextFileSink {
    async fn write_result(&mut self, _result: &AggregateResult, line: &str) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", line)?;
        self.lines_written += 1;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "Text"
    }
}

/// Prints results to standard output
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for StdoutSink {
    async fn write_result(&mut self, _result: &AggregateResult, line: &str) -> Result<(), SinkError> {
        println!("{}", line);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "Stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring_core::window::Window;

    fn result(key: &str, total_score: i64) -> AggregateResult {
        AggregateResult {
            window: Window::Global,
            dimension: "user",
            key: key.to_string(),
            total_score,
        }
    }

    #[tokio::test]
    async fn test_text_sink_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("user_scores.txt");

        let mut sink = TextFileSink::new(&path).unwrap();
        sink.write_result(&result("alice", 10), "user: alice, total_score: 10")
            .await
            .unwrap();
        sink.write_result(&result("bob", 5), "user: bob, total_score: 5")
            .await
            .unwrap();
        sink.flush().await.unwrap();
        assert_eq!(sink.lines_written(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "user: alice, total_score: 10\nuser: bob, total_score: 5\n");
    }

    #[tokio::test]
    async fn test_text_sink_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let mut sink = TextFileSink::new(&path).unwrap();
        sink.write_result(&result("alice", 1), "user: alice, total_score: 1")
            .await
            .unwrap();
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "user: alice, total_score: 1\n");
    }
}
