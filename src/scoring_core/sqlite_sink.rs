//! SQLite sink for aggregate results

use super::aggregate::AggregateResult;
use super::sink::{ResultSink, SinkError};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct SqliteResultSink {
    conn: Connection,
    batch: Vec<(AggregateResult, String)>,
    batch_size: usize,
}

impl SqliteResultSink {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, SinkError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS aggregate_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                window_start INTEGER,
                window_end INTEGER,
                dimension TEXT NOT NULL,
                key TEXT NOT NULL,
                total_score INTEGER NOT NULL,
                line TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_result_group ON aggregate_results(dimension, key, window_start)",
            [],
        )?;

        log::info!("✅ SQLite result sink initialized with WAL mode");

        Ok(Self {
            conn,
            batch: Vec::with_capacity(100),
            batch_size: 100,
        })
    }

    fn flush_batch(&mut self) -> Result<(), SinkError> {
        if self.batch.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for (result, line) in &self.batch {
            // one row per group; a rerun replaces the earlier total
            tx.execute(
                "DELETE FROM aggregate_results
                 WHERE window_start IS ?1 AND window_end IS ?2 AND dimension = ?3 AND key = ?4",
                params![
                    result.window.start_ms(),
                    result.window.end_ms(),
                    result.dimension,
                    result.key,
                ],
            )?;
            tx.execute(
                "INSERT INTO aggregate_results
                 (window_start, window_end, dimension, key, total_score, line)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    result.window.start_ms(),
                    result.window.end_ms(),
                    result.dimension,
                    result.key,
                    result.total_score,
                    line,
                ],
            )?;
        }
        tx.commit()?;

        log::debug!("✅ Flushed {} results to SQLite", self.batch.len());
        self.batch.clear();
        Ok(())
    }
}

#[async_trait]
impl ResultSink for SqliteResultSink {
    async fn write_result(&mut self, result: &AggregateResult, line: &str) -> Result<(), SinkError> {
        self.batch.push((result.clone(), line.to_string()));
        if self.batch.len() >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.flush_batch()
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring_core::window::Window;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_sink_write() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("results.db");
        let mut sink = SqliteResultSink::new(&db_path).unwrap();

        let result = AggregateResult {
            window: Window::Fixed { start_ms: 60_000, end_ms: 120_000 },
            dimension: "team",
            key: "AzureBilby".to_string(),
            total_score: 13,
        };
        sink.write_result(&result, "start: 60000, team: AzureBilby, total_score: 13")
            .await
            .unwrap();
        sink.flush().await.unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let (start, end, total, line): (i64, i64, i64, String) = conn
            .query_row(
                "SELECT window_start, window_end, total_score, line FROM aggregate_results WHERE key = ?1",
                params!["AzureBilby"],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();

        assert_eq!(start, 60_000);
        assert_eq!(end, 120_000);
        assert_eq!(total, 13);
        assert_eq!(line, "start: 60000, team: AzureBilby, total_score: 13");
    }

    #[tokio::test]
    async fn test_global_window_stored_as_null() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("results.db");
        let mut sink = SqliteResultSink::new(&db_path).unwrap();

        let result = AggregateResult {
            window: Window::Global,
            dimension: "user",
            key: "alice".to_string(),
            total_score: 10,
        };
        sink.write_result(&result, "user: alice, total_score: 10")
            .await
            .unwrap();
        sink.flush().await.unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let start: Option<i64> = conn
            .query_row(
                "SELECT window_start FROM aggregate_results WHERE key = ?1",
                params!["alice"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(start, None);
    }

    #[tokio::test]
    async fn test_rewriting_a_group_replaces_its_row() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("results.db");

        let fixed = AggregateResult {
            window: Window::Fixed { start_ms: 0, end_ms: 60_000 },
            dimension: "team",
            key: "red".to_string(),
            total_score: 15,
        };
        let global = AggregateResult {
            window: Window::Global,
            dimension: "user",
            key: "alice".to_string(),
            total_score: 10,
        };

        for total in [15, 20] {
            let mut sink = SqliteResultSink::new(&db_path).unwrap();
            let fixed = AggregateResult { total_score: total, ..fixed.clone() };
            sink.write_result(&fixed, "start: 0, team: red").await.unwrap();
            sink.write_result(&global, "user: alice, total_score: 10").await.unwrap();
            sink.flush().await.unwrap();
        }

        let conn = Connection::open(&db_path).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM aggregate_results", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);

        let total: i64 = conn
            .query_row(
                "SELECT total_score FROM aggregate_results WHERE key = ?1",
                params!["red"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(total, 20);
    }
}
