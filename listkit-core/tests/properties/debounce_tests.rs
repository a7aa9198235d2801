//! Tests for debounced change propagation
//!
//! Virtual-clock properties run on [`ManualScheduler`]; the tokio tests run
//! the same debouncer on a paused runtime clock inside a `LocalSet`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use listkit_core::{
    ChangeDebouncer, CoordinatorSettings, FocusBroker, ListCoordinator, ListKind,
    ManualScheduler, SelectionModifier, TokioScheduler,
};
use proptest::prelude::*;

const WINDOW: Duration = Duration::from_millis(100);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Each burst of updates settles exactly once, carrying its last value
    #[test]
    fn prop_each_burst_settles_once_with_last_value(
        bursts in prop::collection::vec(
            prop::collection::vec((any::<u32>(), 0u64..100), 1..8),
            1..6,
        ),
    ) {
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let debouncer = ChangeDebouncer::new(0u32, WINDOW, scheduler.clone(), move |value| {
            sink.borrow_mut().push(value);
        });

        let mut expected = Vec::new();
        for burst in &bursts {
            for (value, pause) in burst {
                debouncer.process(*value);
                scheduler.advance(ms(*pause));
            }
            expected.push(burst[burst.len() - 1].0);
            scheduler.advance(WINDOW);
        }

        prop_assert_eq!(&*seen.borrow(), &expected);
        prop_assert!(!debouncer.is_pending());
    }

    /// Updates that never pause for a full window never settle
    #[test]
    fn prop_continuous_updates_starve(
        updates in 1usize..50,
        pause in 1u64..100,
    ) {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&fired);
        let debouncer = ChangeDebouncer::new(0usize, WINDOW, scheduler.clone(), move |_| {
            *counter.borrow_mut() += 1;
        });

        for value in 0..updates {
            debouncer.process(value);
            scheduler.advance(ms(pause));
        }

        prop_assert_eq!(*fired.borrow(), 0);
        prop_assert_eq!(debouncer.latest(), updates - 1);
        prop_assert!(debouncer.is_pending());
    }
}

#[test]
fn cancelled_burst_never_settles() {
    let scheduler = ManualScheduler::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let debouncer = ChangeDebouncer::new(String::new(), WINDOW, scheduler.clone(), move |v| {
        sink.borrow_mut().push(v);
    });

    debouncer.process("draft".to_string());
    debouncer.cancel();
    scheduler.advance(ms(500));

    assert!(seen.borrow().is_empty());
    assert_eq!(debouncer.latest(), "draft");
}

#[tokio::test(start_paused = true)]
async fn tokio_scheduler_settles_after_quiet_window() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let seen = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&seen);
            let debouncer = ChangeDebouncer::new(0, WINDOW, TokioScheduler, move |v| {
                sink.borrow_mut().push(v);
            });

            for value in 1..=3 {
                debouncer.process(value);
                tokio::time::sleep(ms(10)).await;
            }
            tokio::time::sleep(ms(50)).await;
            assert!(seen.borrow().is_empty());

            tokio::time::sleep(ms(100)).await;
            assert_eq!(*seen.borrow(), vec![3]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn coordinator_on_tokio_reports_settled_selection() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let items: Vec<String> = ["a", "b", "c"].iter().map(|s| (*s).to_string()).collect();
            let settled = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&settled);

            let mut coordinator: ListCoordinator<String> = ListCoordinator::new(
                ListKind::Commands,
                &CoordinatorSettings::default(),
                FocusBroker::new(),
                TokioScheduler,
            )
            .on_selection_changed(move |set| sink.borrow_mut().push(set));

            coordinator.tap(&items, &items[0], SelectionModifier::None);
            tokio::time::sleep(ms(20)).await;
            coordinator.tap(&items, &items[2], SelectionModifier::Range);
            assert!(coordinator.is_settling());

            tokio::time::sleep(ms(150)).await;
            let expected: HashSet<String> = items.iter().cloned().collect();
            assert_eq!(*settled.borrow(), vec![expected]);
            assert!(!coordinator.is_settling());
        })
        .await;
}
