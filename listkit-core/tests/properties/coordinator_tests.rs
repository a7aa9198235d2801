//! Scenario tests for list coordinators working together

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use listkit_core::{
    CommandOutcome, CoordinatorSettings, DropOutcome, DropPosition, FocusBroker, ListCommand,
    ListCoordinator, ListKind, ManualScheduler, SelectionModifier, apply_move,
};
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

type Coordinator<T> = ListCoordinator<T, ManualScheduler>;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn workflow_moves_into_group_list() {
    let mut settings = CoordinatorSettings::default();
    settings
        .accepted_foreign_kinds
        .insert("groups".into(), vec!["workflows".into()]);
    let broker = FocusBroker::new();
    let scheduler = ManualScheduler::new();

    let mut workflows_list = names(&["wf-1", "wf-2", "wf-3"]);
    let mut groups_list = names(&["group-a", "group-b"]);

    let mut workflows: Coordinator<String> = ListCoordinator::new(
        ListKind::Workflows,
        &settings,
        broker.clone(),
        scheduler.clone(),
    );
    let inserted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&inserted);
    let mut groups: Coordinator<String> =
        ListCoordinator::new(ListKind::Groups, &settings, broker.clone(), scheduler.clone())
            .on_insert(move |ins| sink.borrow_mut().extend(ins.ids.clone()));

    workflows.tap(&workflows_list, &workflows_list[0], SelectionModifier::None);
    workflows.tap(&workflows_list, &workflows_list[2], SelectionModifier::Toggle);
    let payload = workflows.drag_payload(&workflows_list, &workflows_list[2]);
    assert_eq!(payload, "WF|wf-1,wf-3");

    let outcome = groups.drop_payload(&groups_list, &payload, 1, DropPosition::After);
    let DropOutcome::Insert(instruction) = outcome else {
        panic!("expected a transfer, got {outcome:?}");
    };
    assert_eq!(instruction.source_prefix, "WF|");
    groups_list.extend(instruction.ids.iter().cloned());
    assert_eq!(*inserted.borrow(), names(&["wf-1", "wf-3"]));

    // The source list removes what it sent and prunes its selection
    workflows_list.retain(|id| !instruction.ids.contains(id));
    workflows.prune(&workflows_list);
    assert!(workflows.selection().is_empty());

    // Workflows are not accepted in the other direction
    let back = workflows.drop_payload(&workflows_list, "WG|group-a", 0, DropPosition::Before);
    assert!(back.is_ignored());

    assert_eq!(groups_list.len(), 4);
    assert_eq!(broker.pending(), Some("wf-3".to_string()));
}

#[test]
fn uuid_rows_reorder_by_drag() {
    let mut items: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let original = items.clone();
    let mut coordinator: Coordinator<Uuid> = ListCoordinator::new(
        ListKind::Commands,
        &CoordinatorSettings::default(),
        FocusBroker::new(),
        ManualScheduler::new(),
    );

    assert!(coordinator.begin_drag(&items, 3));
    coordinator.update_drag(-3.0 * 32.0);
    let instruction = coordinator.end_drag().unwrap();
    apply_move(&mut items, &instruction);

    assert_eq!(items[0], original[3]);
    assert_eq!(&items[1..], &original[..3]);
}

#[test]
fn selection_settles_once_after_keyboard_walk() {
    let items = names(&["a", "b", "c", "d"]);
    let scheduler = ManualScheduler::new();
    let settled = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&settled);
    let mut coordinator: Coordinator<String> = ListCoordinator::new(
        ListKind::KeyboardShortcuts,
        &CoordinatorSettings::default(),
        FocusBroker::new(),
        scheduler.clone(),
    )
    .on_selection_changed(move |set| sink.borrow_mut().push(set));

    for _ in 0..3 {
        coordinator.handle_accel("Down", &items);
        scheduler.advance(Duration::from_millis(40));
    }
    scheduler.advance(Duration::from_millis(100));

    assert_eq!(*settled.borrow(), vec![HashSet::from(["c".to_string()])]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Commands never panic and the anchor always stays selected
    #[test]
    fn prop_commands_keep_anchor_selected(
        len in 0usize..8,
        commands in prop::collection::vec(
            prop::sample::select(ListCommand::all().to_vec()),
            1..30,
        ),
        taps in prop::collection::vec(any::<Index>(), 0..5),
    ) {
        let mut items: Vec<String> = (0..len).map(|i| format!("row-{i}")).collect();
        let mut coordinator: Coordinator<String> = ListCoordinator::new(
            ListKind::Commands,
            &CoordinatorSettings::default(),
            FocusBroker::new(),
            ManualScheduler::new(),
        );
        if len > 0 {
            for tap in &taps {
                let element = items[tap.index(len)].clone();
                coordinator.tap(&items, &element, SelectionModifier::Toggle);
            }
        }

        for command in commands {
            if let CommandOutcome::Delete(ids) = coordinator.handle_command(command, &items) {
                items.retain(|id| !ids.contains(id));
                coordinator.prune(&items);
            }
            match coordinator.selection().last_selection() {
                Some(anchor) => prop_assert!(coordinator.selection().is_selected(anchor)),
                None => prop_assert!(coordinator.selection().is_empty()),
            }
        }
    }
}
