//! Scoring engine - per-line stages and partial aggregation
//!
//! ```text
//! line → parse → bounds → window → ScoreTable::add_event
//! ```
//!
//! The engine holds configuration only. Each call works on a caller-owned
//! `ScoreTable`, so one engine can be shared across partition workers and
//! their tables merged afterwards.

use super::config::{ConfigError, PipelineConfig};
use crate::scoring_core::{
    AggregateResult, EventParser, GroupingDimension, OutputTemplate, OverflowPolicy,
    ParseErrorCounter, ScoreTable, TimeBounds, Totals, WindowStrategy,
};
use std::sync::Arc;

/// Counters for one pass over the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines_read: u64,
    pub events_parsed: u64,
    pub parse_errors: u64,
    pub events_filtered: u64,
}

impl RunStats {
    pub fn merge(&mut self, other: &RunStats) {
        self.lines_read += other.lines_read;
        self.events_parsed += other.events_parsed;
        self.parse_errors += other.parse_errors;
        self.events_filtered += other.events_filtered;
    }

    pub fn events_aggregated(&self) -> u64 {
        self.events_parsed - self.events_filtered
    }
}

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    parser: EventParser,
    bounds: TimeBounds,
    windowing: WindowStrategy,
    dimension: GroupingDimension,
    template: OutputTemplate,
    overflow: OverflowPolicy,
}

impl ScoringEngine {
    /// Validates the configuration and builds the stage chain
    pub fn new(
        config: &PipelineConfig,
        errors: Arc<dyn ParseErrorCounter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            parser: EventParser::new(&config.separator, config.num_fields, errors)?,
            bounds: config.bounds,
            windowing: config.windowing,
            dimension: config.dimension,
            template: config.template,
            overflow: config.overflow,
        })
    }

    pub fn new_table(&self) -> ScoreTable {
        ScoreTable::new(self.dimension)
    }

    pub fn process_line(&self, line: &str, table: &mut ScoreTable, stats: &mut RunStats) {
        stats.lines_read += 1;

        let event = match self.parser.parse(line) {
            Ok(event) => event,
            Err(_) => {
                stats.parse_errors += 1;
                return;
            }
        };
        stats.events_parsed += 1;

        if !self.bounds.include(&event) {
            log::debug!("Event outside time bounds, skipping: {:?}", event);
            stats.events_filtered += 1;
            return;
        }

        let window = self.windowing.assign(&event);
        log::debug!(
            "{} '{}' score {} → window {}",
            self.dimension.as_str(),
            self.dimension.extract_key(&event),
            event.score,
            window.describe()
        );
        table.add_event(window, &event);
    }

    /// Aggregate a batch of lines into a fresh partial table
    pub fn aggregate<I, S>(&self, lines: I) -> (ScoreTable, RunStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = self.new_table();
        let mut stats = RunStats::default();
        for line in lines {
            self.process_line(line.as_ref(), &mut table, &mut stats);
        }
        (table, stats)
    }

    pub fn finish(&self, table: ScoreTable) -> Totals {
        table.finish(self.overflow)
    }

    pub fn format(&self, result: &AggregateResult) -> String {
        self.template.format(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::config::Preset;
    use crate::scoring_core::{AtomicCounter, Window};

    fn engine(preset: Preset) -> (ScoringEngine, Arc<AtomicCounter>) {
        let counter = Arc::new(AtomicCounter::parse_errors());
        let engine = ScoringEngine::new(&PipelineConfig::preset(preset), counter.clone()).unwrap();
        (engine, counter)
    }

    #[test]
    fn test_invalid_config_rejected_before_processing() {
        let mut config = PipelineConfig::preset(Preset::HourlyTeamScore);
        config.windowing = WindowStrategy::Fixed { size_ms: -1 };
        let counter = Arc::new(AtomicCounter::parse_errors());
        assert!(ScoringEngine::new(&config, counter).is_err());
    }

    #[test]
    fn test_stats_track_every_stage() {
        let (engine, counter) = engine(Preset::HourlyTeamScore);
        let (table, stats) = engine.aggregate([
            "alice,red,10,1000,x",
            "broken",
            "bob,red,5,0,x",
            "carol,blue,3,2000,x",
        ]);

        assert_eq!(
            stats,
            RunStats {
                lines_read: 4,
                events_parsed: 3,
                parse_errors: 1,
                events_filtered: 1,
            }
        );
        assert_eq!(stats.events_aggregated(), 2);
        assert_eq!(counter.value(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_sample_events_by_team() {
        let (engine, _) = engine(Preset::HourlyTeamScore);
        let (table, _) = engine.aggregate(crate::scoring_core::reader::SAMPLE_EVENTS);
        let lines: Vec<String> = engine
            .finish(table)
            .results
            .iter()
            .map(|r| engine.format(r))
            .collect();

        assert_eq!(
            lines,
            vec![
                "start: 1445230920000, team: AsparagusPig, total_score: 20",
                "start: 1447719060000, team: AsparagusPig, total_score: 8",
                "start: 1447719060000, team: AzureBilby, total_score: 13",
                "start: 1447719060000, team: BattleshipGreyPossum, total_score: 14",
            ]
        );
    }

    #[test]
    fn test_sample_events_by_user() {
        let mut config = PipelineConfig::preset(Preset::UserScore);
        config.backend = crate::pipeline::config::BackendType::Stdout;
        let engine = ScoringEngine::new(&config, Arc::new(AtomicCounter::parse_errors())).unwrap();

        let (table, _) = engine.aggregate(crate::scoring_core::reader::SAMPLE_EVENTS);
        let totals = engine.finish(table);

        assert!(totals.results.iter().all(|r| r.window == Window::Global));
        let lines: Vec<String> = totals.results.iter().map(|r| engine.format(r)).collect();
        assert_eq!(
            lines,
            vec![
                "user: user0_AzureBilby, total_score: 8",
                "user: user2_AsparagusPig, total_score: 20",
                "user: user2_AzureBilby, total_score: 8",
                "user: user9_AzureBilby, total_score: 5",
                "user: user9_BattleshipGreyPossum, total_score: 14",
            ]
        );
    }
}
