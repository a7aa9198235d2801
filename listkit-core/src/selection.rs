//! Multi-selection state for an editable list
//!
//! [`SelectionStore`] resolves taps, select-all, delete and one-dimensional
//! keyboard navigation against the host's current collection order. It never
//! observes the collection: after removing rows the host must call
//! [`SelectionStore::prune`].

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::models::{ListItem, position_of};

/// Modifier held while tapping a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionModifier {
    /// Plain tap: select only the tapped row
    #[default]
    None,
    /// Toggle the tapped row in or out of the selection
    Toggle,
    /// Extend from the anchor to the tapped row
    Range,
}

/// Logical navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Previous row in a vertical list
    Up,
    /// Next row in a vertical list
    Down,
    /// Previous item in a horizontal list
    Left,
    /// Next item in a horizontal list
    Right,
}

impl Direction {
    /// Returns `-1`/`+1` for a direction on the list's axis, `None` otherwise.
    #[must_use]
    pub const fn step(self, vertical: bool) -> Option<isize> {
        match (self, vertical) {
            (Self::Up, true) | (Self::Left, false) => Some(-1),
            (Self::Down, true) | (Self::Right, false) => Some(1),
            _ => None,
        }
    }
}

/// Snapshot of a list's selection
///
/// `last_selection` is a member of `selections` whenever `selections` is
/// non-empty, and `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState<I: Eq + Hash> {
    selections: HashSet<I>,
    last_selection: Option<I>,
    initial_selection: Option<I>,
}

impl<I: Eq + Hash> Default for SelectionState<I> {
    fn default() -> Self {
        Self {
            selections: HashSet::new(),
            last_selection: None,
            initial_selection: None,
        }
    }
}

impl<I: Eq + Hash> SelectionState<I> {
    /// Set of selected ids
    #[must_use]
    pub const fn selections(&self) -> &HashSet<I> {
        &self.selections
    }

    /// Last touched id, the anchor for range selection
    #[must_use]
    pub const fn last_selection(&self) -> Option<&I> {
        self.last_selection.as_ref()
    }

    /// Id the list was opened with
    #[must_use]
    pub const fn initial_selection(&self) -> Option<&I> {
        self.initial_selection.as_ref()
    }
}

/// Owns the selection of one list
#[derive(Debug, Clone)]
pub struct SelectionStore<I: Eq + Hash> {
    state: SelectionState<I>,
}

impl<I: Clone + Eq + Hash + Debug> Default for SelectionStore<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone + Eq + Hash + Debug> SelectionStore<I> {
    /// Creates a new empty selection store
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
        }
    }

    /// Creates a store whose list opens with `id` selected
    #[must_use]
    pub fn with_initial(id: I) -> Self {
        let mut store = Self::new();
        store.state.initial_selection = Some(id);
        store.reset();
        store
    }

    /// Returns the current selection snapshot
    #[must_use]
    pub const fn state(&self) -> &SelectionState<I> {
        &self.state
    }

    /// Set of selected ids
    #[must_use]
    pub const fn selections(&self) -> &HashSet<I> {
        &self.state.selections
    }

    /// Last touched id
    #[must_use]
    pub const fn last_selection(&self) -> Option<&I> {
        self.state.last_selection.as_ref()
    }

    /// Checks if an item is selected
    #[must_use]
    pub fn is_selected(&self, id: &I) -> bool {
        self.state.selections.contains(id)
    }

    /// Returns the count of selected items
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.state.selections.len()
    }

    /// Returns true if no items are selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.selections.is_empty()
    }

    /// Clears all selections
    pub fn clear(&mut self) {
        self.state.selections.clear();
        self.state.last_selection = None;
    }

    /// Selects only `id`, making it the anchor
    pub fn select(&mut self, id: I) {
        self.state.selections.clear();
        self.state.selections.insert(id.clone());
        self.state.last_selection = Some(id);
    }

    /// Restores the selection the list was opened with
    pub fn reset(&mut self) {
        self.state.selections.clear();
        self.state.last_selection = self.state.initial_selection.clone();
        if let Some(id) = &self.state.initial_selection {
            self.state.selections.insert(id.clone());
        }
    }

    /// Resolves a tap on `element`.
    ///
    /// Taps on elements that are not part of `collection` are ignored.
    pub fn handle_tap<T>(&mut self, collection: &[T], element: &T, modifier: SelectionModifier)
    where
        T: ListItem<Id = I>,
    {
        let id = element.id();
        let Some(target) = position_of(collection, &id) else {
            tracing::trace!(?id, "Tap on element outside the collection ignored");
            return;
        };

        match modifier {
            SelectionModifier::None => self.select(id),
            SelectionModifier::Toggle => {
                if self.state.selections.remove(&id) {
                    if self.state.last_selection.as_ref() == Some(&id) {
                        self.state.last_selection = self.first_selected_in(collection);
                    }
                } else {
                    self.state.selections.insert(id.clone());
                    self.state.last_selection = Some(id);
                }
            }
            SelectionModifier::Range => {
                let anchor = self
                    .state
                    .last_selection
                    .as_ref()
                    .and_then(|anchor| position_of(collection, anchor));
                match anchor {
                    Some(anchor) => {
                        let (lo, hi) = (anchor.min(target), anchor.max(target));
                        self.state.selections =
                            collection[lo..=hi].iter().map(ListItem::id).collect();
                    }
                    // No usable anchor: the tapped row becomes anchor and sole selection
                    None => self.select(id),
                }
            }
        }

        tracing::debug!(
            ?modifier,
            selected = self.state.selections.len(),
            "Selection updated from tap"
        );
    }

    /// Selects every element of `collection`.
    ///
    /// The anchor is kept if still present, otherwise it moves to the first row.
    pub fn select_all<T>(&mut self, collection: &[T])
    where
        T: ListItem<Id = I>,
    {
        self.state.selections = collection.iter().map(ListItem::id).collect();
        let anchor_valid = self
            .state
            .last_selection
            .as_ref()
            .is_some_and(|id| self.state.selections.contains(id));
        if !anchor_valid {
            self.state.last_selection = collection.first().map(ListItem::id);
        }
    }

    /// Moves the selection one step in `direction`.
    ///
    /// Clamps at the boundaries. Returns the newly selected id, or `None` for
    /// an empty collection or a direction off the list's axis.
    pub fn handle<T>(&mut self, direction: Direction, collection: &[T], vertical: bool) -> Option<I>
    where
        T: ListItem<Id = I>,
    {
        if collection.is_empty() {
            return None;
        }
        let step = direction.step(vertical)?;
        let last = collection.len() - 1;

        let current = self
            .state
            .last_selection
            .as_ref()
            .and_then(|id| position_of(collection, id));
        let next = match (current, step < 0) {
            (Some(index), true) => index.saturating_sub(1),
            (Some(index), false) => (index + 1).min(last),
            (None, true) => last,
            (None, false) => 0,
        };

        let id = collection[next].id();
        self.select(id.clone());
        tracing::trace!(?direction, index = next, "Selection moved");
        Some(id)
    }

    /// Returns the selected ids in collection order, for the host to delete.
    ///
    /// Does not mutate the selection; call [`Self::prune`] after removal.
    #[must_use]
    pub fn delete_selection<T>(&self, collection: &[T]) -> Vec<I>
    where
        T: ListItem<Id = I>,
    {
        self.selected_in_order(collection)
    }

    /// Drops ids no longer present in `collection`.
    pub fn prune<T>(&mut self, collection: &[T])
    where
        T: ListItem<Id = I>,
    {
        let present: HashSet<I> = collection.iter().map(ListItem::id).collect();
        let before = self.state.selections.len();
        self.state.selections.retain(|id| present.contains(id));

        let anchor_valid = self
            .state
            .last_selection
            .as_ref()
            .is_some_and(|id| self.state.selections.contains(id));
        if !anchor_valid {
            self.state.last_selection = self.first_selected_in(collection);
        }

        let removed = before - self.state.selections.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned stale selections");
        }
    }

    /// Deselects `ids`, e.g. after the host deleted them.
    ///
    /// `collection` orders the candidates for a new anchor when the anchor
    /// itself was removed.
    pub fn remove<T>(&mut self, ids: &[I], collection: &[T])
    where
        T: ListItem<Id = I>,
    {
        for id in ids {
            self.state.selections.remove(id);
        }
        let anchor_removed = self
            .state
            .last_selection
            .as_ref()
            .is_some_and(|id| !self.state.selections.contains(id));
        if anchor_removed {
            self.state.last_selection = self.first_selected_in(collection);
        }
    }

    /// Selected ids in collection order
    #[must_use]
    pub fn selected_in_order<T>(&self, collection: &[T]) -> Vec<I>
    where
        T: ListItem<Id = I>,
    {
        collection
            .iter()
            .map(ListItem::id)
            .filter(|id| self.state.selections.contains(id))
            .collect()
    }

    /// Gets selected IDs that are in the given set of visible IDs
    #[must_use]
    pub fn visible_selections(&self, visible_ids: &HashSet<I>) -> Vec<I> {
        self.state
            .selections
            .intersection(visible_ids)
            .cloned()
            .collect()
    }

    /// Gets selected IDs that are NOT in the given set of visible IDs
    #[must_use]
    pub fn hidden_selections(&self, visible_ids: &HashSet<I>) -> Vec<I> {
        self.state
            .selections
            .difference(visible_ids)
            .cloned()
            .collect()
    }

    fn first_selected_in<T>(&self, collection: &[T]) -> Option<I>
    where
        T: ListItem<Id = I>,
    {
        collection
            .iter()
            .map(ListItem::id)
            .find(|id| self.state.selections.contains(id))
    }
}
