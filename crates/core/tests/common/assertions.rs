//! Custom assertion helpers for integration tests.
#![allow(dead_code)]

use cf_protocol::asset_models::AssetKind;
use cf_protocol::ipc::Event;
use cf_protocol::run_models::RunState;

/// Assert that a run's events start with `RunStarted` and end with a
/// terminal event, with exactly one terminal event overall.
pub fn assert_event_sequence(events: &[Event]) {
    assert!(!events.is_empty(), "Event sequence is empty");

    assert!(
        matches!(events[0], Event::RunStarted { .. }),
        "First event should be RunStarted, got: {:?}",
        events[0]
    );

    let terminal = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminal, 1, "Expected exactly one terminal event");
    assert!(
        events.last().is_some_and(Event::is_terminal),
        "Last event should be terminal, got: {:?}",
        events.last()
    );
}

/// Every progress value emitted, in order.
pub fn progress_values(events: &[Event]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ProgressUpdated { progress, .. } => Some(*progress),
            _ => None,
        })
        .collect()
}

/// Assert that progress never decreases.
pub fn assert_monotonic(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "progress decreased from {} to {}",
            pair[0],
            pair[1]
        );
    }
}

/// Asset kinds in creation order.
pub fn asset_kinds(state: &RunState) -> Vec<AssetKind> {
    state.assets.iter().map(|a| a.kind).collect()
}
