//! Property tests for drag-to-reorder and payload drops
//!
//! These tests verify that moves are permutations, that continuous drags
//! stay inside the list, and that a dropped payload moves exactly the rows it
//! names.

use std::collections::BTreeSet;

use listkit_core::{
    DragSession, DropOutcome, DropPosition, MoveInstruction, ReorderEngine, apply_move,
    candidate_gap, drop_gap, encode,
};
use proptest::prelude::*;
use proptest::sample::Index;

fn rows(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("row-{i}")).collect()
}

/// Strategy for a non-empty set of offsets below `len`
fn offsets_strategy(len: usize) -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0..len, 1..=len.min(5))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying a move permutes the list, places the moved rows contiguously
    /// at the destination and keeps every other row in relative order
    #[test]
    fn prop_apply_move_is_stable_permutation(
        (len, offsets) in (1usize..20).prop_flat_map(|len| (Just(len), offsets_strategy(len))),
        destination in any::<Index>(),
    ) {
        let items: Vec<usize> = (0..len).collect();
        let destination = destination.index(len - offsets.len() + 1);
        let instruction = MoveInstruction::new(offsets.iter().copied(), destination);

        let mut moved = items.clone();
        apply_move(&mut moved, &instruction);

        let mut sorted = moved.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&sorted, &items);

        let block: Vec<usize> = offsets.iter().copied().collect();
        prop_assert_eq!(&moved[destination..destination + block.len()], block.as_slice());

        let rest: Vec<usize> = moved.iter().copied().filter(|i| !offsets.contains(i)).collect();
        prop_assert!(rest.windows(2).all(|w| w[0] < w[1]));
    }

    /// A move built from a gap lands the rows right where the gap was
    #[test]
    fn prop_from_gap_matches_gap(
        (len, offsets) in (1usize..20).prop_flat_map(|len| (Just(len), offsets_strategy(len))),
        gap in any::<Index>(),
    ) {
        let gap = gap.index(len + 1);
        let instruction = MoveInstruction::from_gap(offsets.clone(), gap);
        prop_assert!(instruction.destination <= len - offsets.len());

        let mut moved: Vec<usize> = (0..len).collect();
        apply_move(&mut moved, &instruction);
        let before_block = &moved[..instruction.destination];
        prop_assert!(before_block.iter().all(|row| *row < gap));
    }

    /// The drag candidate is always a valid gap, and a committed drag is never a no-op
    #[test]
    fn prop_drag_stays_in_bounds(
        len in 1usize..30,
        current in any::<Index>(),
        translation in -4000.0..4000.0f64,
        row_height in 8.0..64.0f64,
    ) {
        let current = current.index(len);
        let mut session = DragSession::new(current, len, row_height);
        let gap = session.update(translation);
        prop_assert!(gap.is_some_and(|gap| gap <= len));

        if let Some(instruction) = session.finish() {
            prop_assert!(instruction.destination < len);
            prop_assert!(!instruction.is_noop());
        }
    }

    /// Less than half a row of travel never moves the row
    #[test]
    fn prop_small_translation_is_noop(
        len in 1usize..30,
        current in any::<Index>(),
        fraction in -0.49..0.49f64,
        row_height in 8.0..64.0f64,
    ) {
        let current = current.index(len);
        let mut session = DragSession::new(current, len, row_height);
        session.update(fraction * row_height);
        prop_assert_eq!(session.finish(), None);
    }

    /// Dropping an own-list payload moves exactly the named rows to the drop gap
    #[test]
    fn prop_own_drop_moves_named_rows(
        (len, offsets) in (2usize..15).prop_flat_map(|len| (Just(len), offsets_strategy(len))),
        target in any::<Index>(),
        after in any::<bool>(),
    ) {
        let mut items = rows(len);
        let target = target.index(len);
        let position = if after { DropPosition::After } else { DropPosition::Before };
        let ids: Vec<&str> = offsets.iter().map(|&i| items[i].as_str()).collect();
        let payload = encode("WC|", &ids);
        let named: Vec<String> = ids.iter().map(|id| (*id).to_string()).collect();

        let engine = ReorderEngine::new("WC|");
        match engine.drop_payload(&items, &payload, target, position) {
            DropOutcome::Reorder(instruction) => {
                prop_assert_eq!(&instruction.source_offsets, &offsets);
                apply_move(&mut items, &instruction);
                let start = instruction.destination;
                prop_assert_eq!(&items[start..start + named.len()], named.as_slice());
            }
            DropOutcome::Ignored => {
                let gap = drop_gap(target, position, len);
                prop_assert!(MoveInstruction::from_gap(offsets, gap).is_noop());
            }
            DropOutcome::Insert(_) => prop_assert!(false, "own payload treated as transfer"),
        }
    }

    /// Payloads with a prefix the list does not know are ignored
    #[test]
    fn prop_unknown_prefix_ignored(
        payload in "[X-Z]{2}\\|[a-z0-9,]{0,20}",
        len in 1usize..10,
        target in any::<Index>(),
    ) {
        let items = rows(len);
        let engine = ReorderEngine::new("WC|").with_accepted_prefixes(["WF|", "WG|"]);
        let outcome = engine.drop_payload(&items, &payload, target.index(len), DropPosition::Before);
        prop_assert_eq!(outcome, DropOutcome::Ignored);
    }

    /// Candidate computation rejects unusable geometry
    #[test]
    fn prop_degenerate_row_height_rejected(
        row_height in -64.0..=0.0f64,
        translation in -500.0..500.0f64,
    ) {
        prop_assert_eq!(candidate_gap(2, translation, row_height, 5), None);
    }
}

#[test]
fn drag_one_and_a_half_rows_down() {
    let mut items: Vec<char> = "ABCDE".chars().collect();
    let row_height = 40.0;
    let mut session = DragSession::new(2, items.len(), row_height);
    session.update(1.5 * row_height);

    let instruction = session.finish().unwrap();
    assert_eq!(instruction, MoveInstruction::single(2, 3));
    apply_move(&mut items, &instruction);
    assert_eq!(items, "ABDCE".chars().collect::<Vec<_>>());
}

#[test]
fn drop_group_to_front() {
    let mut items = vec![
        "group-1".to_string(),
        "group-4".to_string(),
        "group-7".to_string(),
        "group-9".to_string(),
    ];
    let engine = ReorderEngine::new("WG|");
    let DropOutcome::Reorder(instruction) =
        engine.drop_payload(&items, "WG|group-7", 0, DropPosition::Before)
    else {
        panic!("expected a reorder");
    };
    assert_eq!(instruction.source_offsets, BTreeSet::from([2]));
    assert_eq!(instruction.destination, 0);

    apply_move(&mut items, &instruction);
    assert_eq!(items[0], "group-7");
}
