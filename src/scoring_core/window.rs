//! Event-time window assignment
//!
//! Windows are fixed and non-overlapping, and depend only on the timestamp
//! carried by the event, never on when it was read.

use super::event::GameEvent;
use crate::pipeline::config::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The bucket an event was assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Window {
    /// All of time
    Global,
    /// `[start_ms, end_ms)`, except that a window ending at `i64::MAX` is
    /// closed so the largest timestamp still belongs to it
    Fixed { start_ms: i64, end_ms: i64 },
}

impl Window {
    pub fn start_ms(&self) -> Option<i64> {
        match self {
            Window::Global => None,
            Window::Fixed { start_ms, .. } => Some(*start_ms),
        }
    }

    pub fn end_ms(&self) -> Option<i64> {
        match self {
            Window::Global => None,
            Window::Fixed { end_ms, .. } => Some(*end_ms),
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        match self {
            Window::Global => true,
            Window::Fixed { start_ms, end_ms } => {
                timestamp >= *start_ms && (timestamp < *end_ms || *end_ms == i64::MAX)
            }
        }
    }

    /// Human-readable label for logs
    pub fn describe(&self) -> String {
        match self {
            Window::Global => "global".to_string(),
            Window::Fixed { start_ms, end_ms } => format!(
                "[{}, {})",
                render_millis(*start_ms),
                render_millis(*end_ms)
            ),
        }
    }
}

fn render_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

/// How events are bucketed before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStrategy {
    Global,
    Fixed { size_ms: i64 },
}

impl WindowStrategy {
    pub fn fixed(size_ms: i64) -> Result<Self, ConfigError> {
        if size_ms <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "window size must be positive, got {}ms",
                size_ms
            )));
        }
        Ok(WindowStrategy::Fixed { size_ms })
    }

    /// `global` or a size in milliseconds
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("global") {
            return Ok(WindowStrategy::Global);
        }
        let size_ms = s.parse::<i64>().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "window must be 'global' or a size in milliseconds, got '{}'",
                s
            ))
        })?;
        Self::fixed(size_ms)
    }

    pub fn as_str(&self) -> String {
        match self {
            WindowStrategy::Global => "global".to_string(),
            WindowStrategy::Fixed { size_ms } => format!("{}ms", size_ms),
        }
    }

    pub fn assign(&self, event: &GameEvent) -> Window {
        match self {
            WindowStrategy::Global => Window::Global,
            WindowStrategy::Fixed { size_ms } => fixed_window(event.timestamp, *size_ms),
        }
    }
}

/// `start = floor(ts / size) * size`, computed wide and clamped at the i64 range edges
fn fixed_window(timestamp: i64, size_ms: i64) -> Window {
    let size = size_ms as i128;
    let start = (timestamp as i128).div_euclid(size) * size;
    let end = start + size;
    Window::Fixed {
        start_ms: clamp_i64(start),
        end_ms: clamp_i64(end),
    }
}

fn clamp_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
