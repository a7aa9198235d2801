//! Tests for tracing configuration and initialization

use listkit_core::{
    DropPosition, ReorderEngine, TracingConfig, TracingError, TracingLevel, TracingOutput,
    init_tracing, is_tracing_initialized, span_names,
};
use proptest::prelude::*;

// ========== Strategies ==========

/// Strategy for generating tracing levels
fn arb_tracing_level() -> impl Strategy<Value = TracingLevel> {
    prop_oneof![
        Just(TracingLevel::Error),
        Just(TracingLevel::Warn),
        Just(TracingLevel::Info),
        Just(TracingLevel::Debug),
        Just(TracingLevel::Trace),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Display and FromStr agree for every level
    #[test]
    fn tracing_level_display_parses_back(level in arb_tracing_level()) {
        prop_assert_eq!(level.to_string().parse::<TracingLevel>(), Ok(level));
    }

    /// The default filter names every listkit crate at the configured level
    #[test]
    fn default_filter_uses_configured_level(level in arb_tracing_level()) {
        let filter = TracingConfig::new().with_level(level).env_filter().unwrap();
        let rendered = filter.to_string();
        let expected = format!("listkit_core={level}");
        prop_assert!(rendered.contains(&expected), "{} missing from {}", expected, rendered);
    }

    /// More verbosity never lowers the level
    #[test]
    fn verbosity_is_monotonic(verbose in 0u8..6) {
        let lower = TracingLevel::from_verbosity(verbose, false);
        let higher = TracingLevel::from_verbosity(verbose.saturating_add(1), false);
        prop_assert!(higher >= lower);
    }
}

#[test]
fn span_names_are_distinct() {
    let spans = [
        span_names::SELECTION_TAP,
        span_names::SELECTION_NAVIGATE,
        span_names::COMMAND_HANDLE,
        span_names::REORDER_DRAG,
        span_names::REORDER_DROP,
        span_names::CONFIG_LOAD,
        span_names::SCRIPT_REPLAY,
    ];
    let unique: std::collections::HashSet<_> = spans.iter().collect();
    assert_eq!(unique.len(), spans.len());
    assert!(spans.iter().all(|name| name.contains('.')));
}

/// The only test in this binary that installs the global subscriber
#[test]
fn init_tracing_writes_library_events_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("listkit.log");
    let config = TracingConfig::new()
        .with_level(TracingLevel::Warn)
        .with_output(TracingOutput::File { path: path.clone() });

    init_tracing(&config).unwrap();
    assert!(is_tracing_initialized());
    assert!(matches!(
        init_tracing(&config),
        Err(TracingError::AlreadyInitialized)
    ));

    let items = vec!["a".to_string()];
    let outcome = ReorderEngine::new("WC|").drop_payload(&items, "??|a", 0, DropPosition::Before);
    assert!(outcome.is_ignored());

    let log = std::fs::read_to_string(&path).unwrap();
    assert!(log.contains("unknown prefix"), "log was: {log}");
}
