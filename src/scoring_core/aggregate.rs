//! Keyed score summation per window
//!
//! Partial sums are kept as `i128` so that tables built on different
//! partitions can be merged in any order with an identical outcome. The
//! overflow policy only applies once, when a total is narrowed to `i64`.

use super::event::GameEvent;
use super::key::GroupingDimension;
use super::window::Window;
use crate::pipeline::config::ConfigError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Clamp totals to `i64::MIN..=i64::MAX`
    Saturate,
    /// Drop the group and report an `OverflowError`
    Checked,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Saturate => "saturate",
            OverflowPolicy::Checked => "checked",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "saturate" => Ok(OverflowPolicy::Saturate),
            "checked" => Ok(OverflowPolicy::Checked),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported overflow policy '{}' (expected 'saturate' or 'checked')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowError {
    pub window: Window,
    pub key: String,
}

impl std::fmt::Display for OverflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total score for '{}' in window {} exceeds the 64-bit range",
            self.key,
            self.window.describe()
        )
    }
}

impl std::error::Error for OverflowError {}

/// Running total for one (window, key) group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSum {
    total: i128,
    events: u64,
}

impl ScoreSum {
    pub fn add(&mut self, score: i64) {
        self.total = self.total.saturating_add(score as i128);
        self.events += 1;
    }

    pub fn merge(&mut self, other: &ScoreSum) {
        self.total = self.total.saturating_add(other.total);
        self.events += other.events;
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn finish(&self, policy: OverflowPolicy) -> Option<i64> {
        match policy {
            OverflowPolicy::Saturate => {
                Some(self.total.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
            }
            OverflowPolicy::Checked => i64::try_from(self.total).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub window: Window,
    pub dimension: &'static str,
    pub key: String,
    pub total_score: i64,
}

/// Finalized output of a table
#[derive(Debug, Default)]
pub struct Totals {
    pub results: Vec<AggregateResult>,
    pub overflows: Vec<OverflowError>,
}

/// Per-(window, key) partial sums for one dimension
#[derive(Debug, Clone)]
pub struct ScoreTable {
    dimension: GroupingDimension,
    groups: HashMap<(Window, String), ScoreSum>,
}

impl ScoreTable {
    pub fn new(dimension: GroupingDimension) -> Self {
        Self {
            dimension,
            groups: HashMap::new(),
        }
    }

    pub fn dimension(&self) -> GroupingDimension {
        self.dimension
    }

    pub fn add_event(&mut self, window: Window, event: &GameEvent) {
        let key = self.dimension.extract_key(event);
        self.groups
            .entry((window, key.to_string()))
            .or_default()
            .add(event.score);
    }

    /// Fold another partial table into this one
    pub fn merge(&mut self, other: ScoreTable) {
        debug_assert_eq!(self.dimension, other.dimension);
        for (group, sum) in other.groups {
            self.groups.entry(group).or_default().merge(&sum);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, window: Window, key: &str) -> Option<&ScoreSum> {
        self.groups.get(&(window, key.to_string()))
    }

    /// Narrow every group to `i64` and sort by window, then key
    pub fn finish(self, policy: OverflowPolicy) -> Totals {
        let dimension = self.dimension.as_str();
        let mut groups: Vec<_> = self.groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut totals = Totals::default();
        for ((window, key), sum) in groups {
            match sum.finish(policy) {
                Some(total_score) => totals.results.push(AggregateResult {
                    window,
                    dimension,
                    key,
                    total_score,
                }),
                None => {
                    let err = OverflowError { window, key };
                    log::error!("❌ {}", err);
                    totals.overflows.push(err);
                }
            }
        }
        totals
    }
}
