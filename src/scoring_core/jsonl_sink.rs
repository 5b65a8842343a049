//! JSONL sink - one JSON object per aggregate result

use super::aggregate::AggregateResult;
use super::sink::{ResultSink, SinkError};
use super::window::Window;
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    window: &'a Window,
    dimension: &'a str,
    key: &'a str,
    total_score: i64,
    line: &'a str,
}

pub struct JsonlResultSink {
    writer: BufWriter<std::fs::File>,
}

impl JsonlResultSink {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        log::info!("📝 Writing JSONL results to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Drop for JsonlResultSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[async_trait]
impl ResultSink for JsonlResultSink {
    async fn write_result(&mut self, result: &AggregateResult, line: &str) -> Result<(), SinkError> {
        let record = ResultRecord {
            window: &result.window,
            dimension: result.dimension,
            key: &result.key,
            total_score: result.total_score,
            line,
        };
        let json = serde_json::to_string(&record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_jsonl_record_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team_scores.jsonl");

        let result = AggregateResult {
            window: Window::Fixed { start_ms: 0, end_ms: 60_000 },
            dimension: "team",
            key: "red".to_string(),
            total_score: 15,
        };

        let mut sink = JsonlResultSink::new(&path).unwrap();
        sink.write_result(&result, "start: 0, team: red, total_score: 15")
            .await
            .unwrap();
        sink.flush().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();

        assert_eq!(parsed["window"]["kind"], "fixed");
        assert_eq!(parsed["window"]["start_ms"], 0);
        assert_eq!(parsed["window"]["end_ms"], 60_000);
        assert_eq!(parsed["dimension"], "team");
        assert_eq!(parsed["key"], "red");
        assert_eq!(parsed["total_score"], 15);
        assert_eq!(parsed["line"], "start: 0, team: red, total_score: 15");
    }

    #[tokio::test]
    async fn test_reopening_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_scores.jsonl");
        let result = AggregateResult {
            window: Window::Global,
            dimension: "user",
            key: "alice".to_string(),
            total_score: 10,
        };

        for _ in 0..2 {
            let mut sink = JsonlResultSink::new(&path).unwrap();
            sink.write_result(&result, "user: alice, total_score: 10")
                .await
                .unwrap();
            sink.flush().await.unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
