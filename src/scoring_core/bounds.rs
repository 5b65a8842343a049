//! Analysis interval filter
//!
//! Input usually arrives in batches (say, one per day). A batch can carry a
//! tail of events that belong to the neighbouring batch, and those must be
//! dropped before aggregation or reprocessing both batches counts them twice.

use super::event::GameEvent;
use crate::pipeline::config::ConfigError;

/// Exclusive bounds on event time. `None` disables that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeBounds {
    pub min_exclusive: Option<i64>,
    pub max_exclusive: Option<i64>,
}

impl TimeBounds {
    pub fn new(min_exclusive: Option<i64>, max_exclusive: Option<i64>) -> Result<Self, ConfigError> {
        if let (Some(min), Some(max)) = (min_exclusive, max_exclusive) {
            // (min, max) must contain at least one millisecond
            if max <= min.saturating_add(1) {
                return Err(ConfigError::InvalidValue(format!(
                    "time bounds ({}, {}) admit no events",
                    min, max
                )));
            }
        }

        Ok(Self {
            min_exclusive,
            max_exclusive,
        })
    }

    /// No filtering at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn after(min_exclusive: i64) -> Self {
        Self {
            min_exclusive: Some(min_exclusive),
            max_exclusive: None,
        }
    }

    pub fn include(&self, event: &GameEvent) -> bool {
        let above = self.min_exclusive.map_or(true, |min| event.timestamp > min);
        let below = self.max_exclusive.map_or(true, |max| event.timestamp < max);
        above && below
    }
}
