//! Output line templates
//!
//! Downstream consumers match on the exact text, so both templates are
//! kept verbatim rather than unified.

use super::aggregate::AggregateResult;
use super::key::GroupingDimension;
use super::window::WindowStrategy;
use crate::pipeline::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTemplate {
    /// `user: <key>, total_score: <total>`
    UserTotal,
    /// `start: <window_start>, team: <key>, total_score: <total>`
    TeamWindow,
}

impl OutputTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputTemplate::UserTotal => "user_total",
            OutputTemplate::TeamWindow => "team_window",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "user_total" => Ok(OutputTemplate::UserTotal),
            "team_window" => Ok(OutputTemplate::TeamWindow),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported output template '{}' (expected 'user_total' or 'team_window')",
                other
            ))),
        }
    }

    /// The window template prints a start time, which a global window lacks
    pub fn check_windowing(&self, strategy: &WindowStrategy) -> Result<(), ConfigError> {
        match (self, strategy) {
            (OutputTemplate::TeamWindow, WindowStrategy::Global) => Err(ConfigError::InvalidValue(
                "output template 'team_window' requires fixed windows".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Each template labels the key, so the grouping has to match the label
    pub fn check_dimension(&self, dimension: GroupingDimension) -> Result<(), ConfigError> {
        match (self, dimension) {
            (OutputTemplate::UserTotal, GroupingDimension::User)
            | (OutputTemplate::TeamWindow, GroupingDimension::Team) => Ok(()),
            _ => Err(ConfigError::InvalidValue(format!(
                "output template '{}' cannot be used when grouping by {}",
                self.as_str(),
                dimension.as_str()
            ))),
        }
    }

    pub fn format(&self, result: &AggregateResult) -> String {
        match self {
            OutputTemplate::UserTotal => {
                format!("user: {}, total_score: {}", result.key, result.total_score)
            }
            OutputTemplate::TeamWindow => format!(
                "start: {}, team: {}, total_score: {}",
                result.window.start_ms().unwrap_or(i64::MIN),
                result.key,
                result.total_score
            ),
        }
    }
}
