//! Pipeline configuration from presets, environment variables and arguments
//!
//! Every value is validated before any input is read; a bad value is a
//! `ConfigError` and the run never starts.

use crate::scoring_core::{
    event::MIN_FIELDS, GroupingDimension, OutputTemplate, OverflowPolicy, TimeBounds,
    WindowStrategy,
};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Text,
    Stdout,
    Jsonl,
    Sqlite,
}

impl BackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Text => "text",
            BackendType::Stdout => "stdout",
            BackendType::Jsonl => "jsonl",
            BackendType::Sqlite => "sqlite",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(BackendType::Text),
            "stdout" => Ok(BackendType::Stdout),
            "jsonl" => Ok(BackendType::Jsonl),
            "sqlite" => Ok(BackendType::Sqlite),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported output backend '{}' (expected text, stdout, jsonl or sqlite)",
                other
            ))),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing configuration value: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Starting point for each game program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Per-user totals over the whole input
    UserScore,
    /// Per-team totals in fixed event-time windows
    HourlyTeamScore,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// `None` falls back to the built-in sample events
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub backend: BackendType,
    pub separator: String,
    pub num_fields: usize,
    pub bounds: TimeBounds,
    pub windowing: WindowStrategy,
    pub dimension: GroupingDimension,
    pub template: OutputTemplate,
    pub overflow: OverflowPolicy,
    /// Number of input partitions aggregated in parallel
    pub partitions: usize,
}

impl PipelineConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::UserScore => Self {
                input_path: None,
                output_path: None,
                backend: BackendType::Text,
                separator: ",".to_string(),
                num_fields: 5,
                bounds: TimeBounds::unbounded(),
                windowing: WindowStrategy::Global,
                dimension: GroupingDimension::User,
                template: OutputTemplate::UserTotal,
                overflow: OverflowPolicy::Saturate,
                partitions: 4,
            },
            Preset::HourlyTeamScore => Self {
                input_path: None,
                output_path: None,
                backend: BackendType::Stdout,
                separator: ",".to_string(),
                num_fields: 5,
                bounds: TimeBounds::after(1),
                windowing: WindowStrategy::Fixed { size_ms: 60_000 },
                dimension: GroupingDimension::Team,
                template: OutputTemplate::TeamWindow,
                overflow: OverflowPolicy::Saturate,
                partitions: 4,
            },
        }
    }

    /// Load configuration from environment variables on top of a preset
    ///
    /// Environment variables:
    /// - `GAME_INPUT_PATH` (default: built-in sample events)
    /// - `GAME_OUTPUT_PATH`
    /// - `GAME_OUTPUT_BACKEND` (text|stdout|jsonl|sqlite)
    /// - `GAME_FIELD_SEPARATOR` (default: `,`)
    /// - `GAME_NUM_FIELDS` (default: 5)
    /// - `GAME_MIN_TIMESTAMP_MS`, `GAME_MAX_TIMESTAMP_MS` (`none` disables)
    /// - `GAME_WINDOW` (`global` or size in milliseconds)
    /// - `GAME_GROUP_BY` (user|team)
    /// - `GAME_OUTPUT_TEMPLATE` (user_total|team_window)
    /// - `GAME_OVERFLOW_POLICY` (saturate|checked)
    /// - `GAME_PARTITIONS` (default: 4)
    pub fn from_env(preset: Preset) -> Result<Self, ConfigError> {
        Self::from_lookup(preset, |key| env::var(key).ok())
    }

    /// Environment, then command-line flags, then validation
    pub fn load(preset: Preset, args: &[String]) -> Result<Self, ConfigError> {
        let mut config = Self::from_env(preset)?;
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup<F>(preset: Preset, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::preset(preset);

        if let Some(path) = lookup("GAME_INPUT_PATH").filter(|s| !s.is_empty()) {
            config.input_path = Some(path.into());
        }
        if let Some(path) = lookup("GAME_OUTPUT_PATH").filter(|s| !s.is_empty()) {
            config.output_path = Some(path.into());
        }
        if let Some(backend) = lookup("GAME_OUTPUT_BACKEND") {
            config.backend = BackendType::from_str(&backend)?;
        }
        if let Some(separator) = lookup("GAME_FIELD_SEPARATOR") {
            config.separator = separator;
        }
        if let Some(num_fields) = lookup("GAME_NUM_FIELDS") {
            config.num_fields = parse_number("GAME_NUM_FIELDS", &num_fields)?;
        }

        let mut min = config.bounds.min_exclusive;
        let mut max = config.bounds.max_exclusive;
        if let Some(value) = lookup("GAME_MIN_TIMESTAMP_MS") {
            min = parse_bound("GAME_MIN_TIMESTAMP_MS", &value)?;
        }
        if let Some(value) = lookup("GAME_MAX_TIMESTAMP_MS") {
            max = parse_bound("GAME_MAX_TIMESTAMP_MS", &value)?;
        }
        config.bounds = TimeBounds::new(min, max)?;

        if let Some(window) = lookup("GAME_WINDOW") {
            config.windowing = WindowStrategy::from_str(&window)?;
        }
        if let Some(dimension) = lookup("GAME_GROUP_BY") {
            config.dimension = GroupingDimension::from_str(&dimension)?;
        }
        if let Some(template) = lookup("GAME_OUTPUT_TEMPLATE") {
            config.template = OutputTemplate::from_str(&template)?;
        }
        if let Some(policy) = lookup("GAME_OVERFLOW_POLICY") {
            config.overflow = OverflowPolicy::from_str(&policy)?;
        }
        if let Some(partitions) = lookup("GAME_PARTITIONS") {
            config.partitions = parse_number("GAME_PARTITIONS", &partitions)?;
        }

        Ok(config)
    }

    /// Apply `--input`, `--output` and `--backend` from the command line
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), ConfigError> {
        if let Some(input) = arg_value(args, "--input")? {
            self.input_path = Some(input.into());
        }
        if let Some(output) = arg_value(args, "--output")? {
            self.output_path = Some(output.into());
        }
        if let Some(backend) = arg_value(args, "--backend")? {
            self.backend = BackendType::from_str(&backend)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::InvalidValue(
                "field separator cannot be empty".to_string(),
            ));
        }
        if self.num_fields < MIN_FIELDS {
            return Err(ConfigError::InvalidValue(format!(
                "expected field count must be at least {}, got {}",
                MIN_FIELDS, self.num_fields
            )));
        }
        if let WindowStrategy::Fixed { size_ms } = self.windowing {
            WindowStrategy::fixed(size_ms)?;
        }
        TimeBounds::new(self.bounds.min_exclusive, self.bounds.max_exclusive)?;
        self.template.check_windowing(&self.windowing)?;
        self.template.check_dimension(self.dimension)?;
        if self.partitions == 0 {
            return Err(ConfigError::InvalidValue(
                "partition count must be at least 1".to_string(),
            ));
        }
        if self.backend != BackendType::Stdout && self.output_path.is_none() {
            return Err(ConfigError::MissingVariable("GAME_OUTPUT_PATH".to_string()));
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        let input = self
            .input_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in sample events".to_string());
        let output = self
            .output_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let bound = |b: Option<i64>| b.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string());

        log::info!("📊 Configuration:");
        log::info!("   ├─ Input: {}", input);
        log::info!("   ├─ Output: {} ({})", output, self.backend.as_str());
        log::info!("   ├─ Format: {} fields separated by '{}'", self.num_fields, self.separator);
        log::info!(
            "   ├─ Time bounds: ({}, {})",
            bound(self.bounds.min_exclusive),
            bound(self.bounds.max_exclusive)
        );
        log::info!("   ├─ Window: {}", self.windowing.as_str());
        log::info!("   ├─ Group by: {}", self.dimension.as_str());
        log::info!("   ├─ Template: {}", self.template.as_str());
        log::info!("   ├─ Overflow policy: {}", self.overflow.as_str());
        log::info!("   └─ Partitions: {}", self.partitions);
    }
}

fn parse_number(var: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| {
        ConfigError::InvalidValue(format!("{} must be a non-negative integer, got '{}'", var, value))
    })
}

fn parse_bound(var: &str, value: &str) -> Result<Option<i64>, ConfigError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue(format!("{} must be milliseconds or 'none', got '{}'", var, value)))
}

fn arg_value(args: &[String], flag: &str) -> Result<Option<String>, ConfigError> {
    match args.iter().position(|x| x == flag) {
        Some(idx) => args
            .get(idx + 1)
            .cloned()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue(format!("{} requires a value", flag))),
        None => Ok(None),
    }
}
