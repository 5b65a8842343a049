#[cfg(test)]
mod tests {
    use {
        crate::pipeline::{BackendType, PipelineConfig, Preset, ScoringEngine},
        crate::scoring_core::{
            AtomicCounter, GroupingDimension, OutputTemplate, TimeBounds, Window, WindowStrategy,
        },
        std::sync::Arc,
    };

    fn config(dimension: GroupingDimension, template: OutputTemplate) -> PipelineConfig {
        let mut config = PipelineConfig::preset(Preset::HourlyTeamScore);
        config.backend = BackendType::Stdout;
        config.bounds = TimeBounds::unbounded();
        config.windowing = WindowStrategy::Fixed { size_ms: 60_000 };
        config.dimension = dimension;
        config.template = template;
        config
    }

    fn engine(config: &PipelineConfig) -> (ScoringEngine, Arc<AtomicCounter>) {
        let counter = Arc::new(AtomicCounter::parse_errors());
        (ScoringEngine::new(config, counter.clone()).unwrap(), counter)
    }

    /// One well-formed line grouped by user
    #[test]
    fn test_single_user_event() {
        let (engine, _) = engine(&config(GroupingDimension::User, OutputTemplate::UserTotal));
        let (table, _) = engine.aggregate(["alice,red,10,1000,ignored"]);
        let totals = engine.finish(table);

        assert_eq!(totals.results.len(), 1);
        let result = &totals.results[0];
        assert_eq!(result.window, Window::Fixed { start_ms: 0, end_ms: 60_000 });
        assert_eq!(result.key, "alice");
        assert_eq!(result.total_score, 10);

        let line = engine.format(result);
        assert!(line.contains("alice"));
        assert!(line.contains("10"));
    }

    /// Two users on one team collapse into a single team total
    #[test]
    fn test_team_totals_combine_users() {
        let (engine, _) = engine(&config(GroupingDimension::Team, OutputTemplate::TeamWindow));
        let (table, _) = engine.aggregate(["alice,red,10,1000,x", "bob,red,5,2000,x"]);
        let totals = engine.finish(table);

        assert_eq!(totals.results.len(), 1);
        let result = &totals.results[0];
        assert_eq!(result.window, Window::Fixed { start_ms: 0, end_ms: 60_000 });
        assert_eq!(result.key, "red");
        assert_eq!(result.total_score, 15);
        assert_eq!(engine.format(result), "start: 0, team: red, total_score: 15");
    }

    /// A malformed line is counted and the following lines still aggregate
    #[test]
    fn test_malformed_line_does_not_stop_processing() {
        let (engine, counter) = engine(&config(GroupingDimension::User, OutputTemplate::UserTotal));
        let (table, stats) = engine.aggregate(["broken", "alice,red,10,1000,x"]);

        assert_eq!(stats.events_parsed, 1);
        assert_eq!(stats.parse_errors, 1);
        assert_eq!(counter.value(), 1);

        let totals = engine.finish(table);
        assert_eq!(totals.results.len(), 1);
        assert_eq!(totals.results[0].key, "alice");
    }

    #[test]
    fn test_malformed_only_input_produces_nothing() {
        let (engine, counter) = engine(&config(GroupingDimension::User, OutputTemplate::UserTotal));
        let (table, stats) = engine.aggregate(["broken"]);

        assert_eq!(stats.events_parsed, 0);
        assert_eq!(counter.value(), 1);
        assert!(engine.finish(table).results.is_empty());
    }

    /// A parsable event at the lower bound never reaches aggregation
    #[test]
    fn test_event_at_lower_bound_excluded() {
        let mut config = config(GroupingDimension::User, OutputTemplate::UserTotal);
        config.bounds = TimeBounds::after(1);
        let (engine, counter) = engine(&config);

        let (table, stats) = engine.aggregate(["alice,red,10,0,x"]);

        assert_eq!(stats.events_parsed, 1);
        assert_eq!(stats.events_filtered, 1);
        assert_eq!(counter.value(), 0);
        assert!(engine.finish(table).results.is_empty());
    }

    #[test]
    fn test_event_just_above_lower_bound_included() {
        let mut config = config(GroupingDimension::User, OutputTemplate::UserTotal);
        config.bounds = TimeBounds::after(1);
        let (engine, _) = engine(&config);

        let (table, _) = engine.aggregate(["alice,red,10,2,x"]);
        assert_eq!(engine.finish(table).results.len(), 1);
    }

    /// Reversing and interleaving the input leaves every total unchanged
    #[test]
    fn test_order_does_not_matter() {
        let (engine, _) = engine(&config(GroupingDimension::Team, OutputTemplate::TeamWindow));
        let lines: Vec<String> = (0..30)
            .map(|i| format!("u{},t{},{},{},x", i % 4, i % 2, i - 12, i * 7_000))
            .collect();

        let (forward, _) = engine.aggregate(&lines);
        let (backward, _) = engine.aggregate(lines.iter().rev());
        let (interleaved, _) = engine.aggregate(
            lines
                .iter()
                .step_by(2)
                .chain(lines.iter().skip(1).step_by(2)),
        );

        let expected = engine.finish(forward).results;
        assert_eq!(engine.finish(backward).results, expected);
        assert_eq!(engine.finish(interleaved).results, expected);
    }
}
