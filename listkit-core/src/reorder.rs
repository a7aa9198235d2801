//! Drag-and-drop reordering model for editable lists
//!
//! This module provides a pure data model for drag-and-drop operations,
//! allowing property-based testing without any UI toolkit. Two gestures are
//! covered:
//!
//! - a continuous drag of a row within its own list ([`DragSession`]), where
//!   the candidate position follows the pointer's vertical translation;
//! - a drop of an encoded payload ([`ReorderEngine::drop_payload`]), which is
//!   either a reorder of the target's own rows or a transfer from another
//!   list.
//!
//! All arithmetic is on `usize` offsets. A *gap* is an insertion point in the
//! pre-move list: gap `g` sits between rows `g - 1` and `g`, so `0..=len` are
//! valid gaps. Gaps are converted to [`MoveInstruction`]s only at the end.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use crate::models::{InsertInstruction, ListItem, MoveInstruction, position_of};
use crate::payload::{DragPayload, ListKind, encode};
use crate::selection::SelectionStore;

/// Drop position relative to a target row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPosition {
    /// Drop before the target row (line indicator above)
    #[default]
    Before,
    /// Drop after the target row (line indicator below)
    After,
}

/// Row geometry used for drop calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropConfig {
    /// Height of each row in pixels
    pub row_height: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self { row_height: 32.0 }
    }
}

impl DropConfig {
    /// Returns true if the geometry can be used for calculations
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.row_height.is_finite() && self.row_height > 0.0
    }
}

/// Calculates the drop position based on Y coordinate within a row
///
/// Top half: Before. Bottom half: After.
#[must_use]
pub fn calculate_drop_position(y_in_row: f64, config: &DropConfig) -> DropPosition {
    if y_in_row < config.row_height / 2.0 {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

/// Calculates which row index is at a given Y coordinate
///
/// Returns `None` for unusable geometry or a negative coordinate.
#[must_use]
pub fn calculate_row_index(y: f64, config: &DropConfig) -> Option<usize> {
    if !config.is_usable() || !y.is_finite() || y < 0.0 {
        return None;
    }
    Some((y / config.row_height) as usize)
}

/// Calculates the Y position of the placement indicator for a gap
#[must_use]
pub fn calculate_indicator_y(gap: usize, config: &DropConfig) -> f64 {
    gap as f64 * config.row_height
}

/// Converts a drop target and position into a gap, clamped to `len`
#[must_use]
pub fn drop_gap(target: usize, position: DropPosition, len: usize) -> usize {
    let gap = match position {
        DropPosition::Before => target,
        DropPosition::After => target.saturating_add(1),
    };
    gap.min(len)
}

/// Live candidate gap for a row at `current` dragged by `translation`.
///
/// `clamp(current + round((T + H/2) / H), 0, count)`. Returns `None` for a
/// non-positive or non-finite row height, or a non-finite translation.
#[must_use]
pub fn candidate_gap(current: usize, translation: f64, row_height: f64, count: usize) -> Option<usize> {
    if !row_height.is_finite() || row_height <= 0.0 || !translation.is_finite() {
        return None;
    }
    let shift = ((translation + row_height / 2.0) / row_height).round() as i64;
    let gap = (current as i64).saturating_add(shift).clamp(0, count as i64);
    Some(gap as usize)
}

/// A continuous drag of one row (or one multi-selection) within its list
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    current: usize,
    count: usize,
    row_height: f64,
    translation: f64,
    source_offsets: BTreeSet<usize>,
}

impl DragSession {
    /// Starts dragging the row at `current` in a list of `count` rows
    #[must_use]
    pub fn new(current: usize, count: usize, row_height: f64) -> Self {
        Self {
            current,
            count,
            row_height,
            translation: 0.0,
            source_offsets: BTreeSet::from([current]),
        }
    }

    /// Carries additional selected rows along with the dragged row.
    ///
    /// Ignored unless `offsets` contains the dragged row itself.
    #[must_use]
    pub fn with_source_offsets(mut self, offsets: BTreeSet<usize>) -> Self {
        if offsets.contains(&self.current) {
            self.source_offsets = offsets;
        }
        self
    }

    /// Updates the vertical translation; returns the candidate gap
    pub fn update(&mut self, translation: f64) -> Option<usize> {
        self.translation = translation;
        self.candidate_gap()
    }

    /// Candidate gap for the current translation
    #[must_use]
    pub fn candidate_gap(&self) -> Option<usize> {
        candidate_gap(self.current, self.translation, self.row_height, self.count)
    }

    /// Candidate gap, or `None` while releasing would not change the order
    #[must_use]
    pub fn indicator_gap(&self) -> Option<usize> {
        self.pending_move().and_then(|_| self.candidate_gap())
    }

    /// Y position of the placement indicator, relative to the list top
    #[must_use]
    pub fn indicator_y(&self) -> Option<f64> {
        self.candidate_gap().map(|gap| gap as f64 * self.row_height)
    }

    /// Offset of the row under the pointer
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Rows carried by this drag
    #[must_use]
    pub const fn source_offsets(&self) -> &BTreeSet<usize> {
        &self.source_offsets
    }

    /// Move the drag would commit right now, if any
    #[must_use]
    pub fn pending_move(&self) -> Option<MoveInstruction> {
        if self.translation == 0.0 {
            return None;
        }
        let gap = self.candidate_gap()?;
        let instruction = MoveInstruction::from_gap(self.source_offsets.clone(), gap);
        (!instruction.is_noop()).then_some(instruction)
    }

    /// Ends the drag, returning the move to commit
    #[must_use]
    pub fn finish(self) -> Option<MoveInstruction> {
        let instruction = self.pending_move();
        match &instruction {
            Some(mv) => tracing::debug!(
                from = ?mv.source_offsets,
                destination = mv.destination,
                "Drag committed"
            ),
            None => tracing::trace!(current = self.current, "Drag ended without a move"),
        }
        instruction
    }
}

/// Result of dropping a payload on a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Rows of the target list change places
    Reorder(MoveInstruction),
    /// Ids from another list are appended to the target list
    Insert(InsertInstruction),
    /// Nothing to do: unknown prefix, malformed payload, or no effective move
    Ignored,
}

impl DropOutcome {
    /// Returns true if the drop has no effect
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Computes drag payloads and drop outcomes for one list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderEngine {
    prefix: String,
    accepted_prefixes: Vec<String>,
}

impl ReorderEngine {
    /// Creates an engine for a list tagged with `prefix`
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            accepted_prefixes: Vec::new(),
        }
    }

    /// Creates an engine using the default prefix of `kind`
    #[must_use]
    pub fn for_kind(kind: ListKind) -> Self {
        Self::new(kind.default_prefix())
    }

    /// Accepts transfers from lists tagged with `prefixes`
    #[must_use]
    pub fn with_accepted_prefixes<S: Into<String>>(
        mut self,
        prefixes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.accepted_prefixes = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|prefix| *prefix != self.prefix)
            .collect();
        self
    }

    /// This list's own prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefixes accepted from other lists
    #[must_use]
    pub fn accepted_prefixes(&self) -> &[String] {
        &self.accepted_prefixes
    }

    /// Ids carried by a drag starting on `dragged`.
    ///
    /// All selected ids, in collection order, when `dragged` is part of the
    /// selection; otherwise only `dragged`.
    #[must_use]
    pub fn dragged_ids<T: ListItem>(
        collection: &[T],
        dragged: &T,
        selection: &SelectionStore<T::Id>,
    ) -> Vec<T::Id> {
        let id = dragged.id();
        if selection.is_selected(&id) {
            selection.selected_in_order(collection)
        } else {
            vec![id]
        }
    }

    /// Offsets carried by a drag starting on the row at `index`
    #[must_use]
    pub fn dragged_offsets<T: ListItem>(
        collection: &[T],
        index: usize,
        selection: &SelectionStore<T::Id>,
    ) -> BTreeSet<usize> {
        let Some(dragged) = collection.get(index) else {
            return BTreeSet::new();
        };
        if selection.is_selected(&dragged.id()) {
            collection
                .iter()
                .enumerate()
                .filter(|(_, item)| selection.is_selected(&item.id()))
                .map(|(offset, _)| offset)
                .collect()
        } else {
            BTreeSet::from([index])
        }
    }

    /// Encodes the payload for a drag starting on `dragged`
    #[must_use]
    pub fn drag_payload<T>(
        &self,
        collection: &[T],
        dragged: &T,
        selection: &SelectionStore<T::Id>,
    ) -> String
    where
        T: ListItem,
        T::Id: Display,
    {
        let ids: Vec<String> = Self::dragged_ids(collection, dragged, selection)
            .iter()
            .map(ToString::to_string)
            .collect();
        encode(&self.prefix, &ids)
    }

    /// Starts a continuous drag on the row at `index`.
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn begin_drag<T: ListItem>(
        &self,
        collection: &[T],
        index: usize,
        row_height: f64,
        selection: &SelectionStore<T::Id>,
    ) -> Option<DragSession> {
        if index >= collection.len() {
            return None;
        }
        let offsets = Self::dragged_offsets(collection, index, selection);
        Some(DragSession::new(index, collection.len(), row_height).with_source_offsets(offsets))
    }

    /// Resolves a dropped payload against this list.
    ///
    /// Own prefix: ids are resolved to their current offsets (missing ids are
    /// skipped) and moved to the gap at `target`/`position`. Accepted foreign
    /// prefix: the ids are handed back for appending. Anything else is
    /// ignored.
    #[must_use]
    pub fn drop_payload<T>(
        &self,
        collection: &[T],
        payload: &str,
        target: usize,
        position: DropPosition,
    ) -> DropOutcome
    where
        T: ListItem,
        T::Id: Display,
    {
        let prefixes = std::iter::once(self.prefix.as_str())
            .chain(self.accepted_prefixes.iter().map(String::as_str));
        let Some(decoded) = DragPayload::decode_any(payload, prefixes) else {
            tracing::warn!(payload, prefix = %self.prefix, "Dropped payload has an unknown prefix");
            return DropOutcome::Ignored;
        };
        if decoded.is_empty() {
            tracing::trace!("Dropped payload carries no ids");
            return DropOutcome::Ignored;
        }

        if decoded.prefix != self.prefix {
            tracing::debug!(
                from = %decoded.prefix,
                count = decoded.ids.len(),
                "Cross-list drop"
            );
            return DropOutcome::Insert(InsertInstruction {
                source_prefix: decoded.prefix,
                ids: decoded.ids,
            });
        }

        let index: HashMap<String, usize> = collection
            .iter()
            .enumerate()
            .map(|(offset, item)| (item.id().to_string(), offset))
            .collect();
        let offsets: BTreeSet<usize> = decoded
            .ids
            .iter()
            .filter_map(|id| index.get(id).copied())
            .collect();
        if offsets.is_empty() {
            tracing::debug!("None of the dropped ids are in this list any more");
            return DropOutcome::Ignored;
        }

        let gap = drop_gap(target, position, collection.len());
        let instruction = MoveInstruction::from_gap(offsets, gap);
        if instruction.is_noop() {
            return DropOutcome::Ignored;
        }
        tracing::debug!(
            from = ?instruction.source_offsets,
            destination = instruction.destination,
            "Drop reorders list"
        );
        DropOutcome::Reorder(instruction)
    }

    /// Offset of `id` in `collection`, for hosts mapping drop targets
    #[must_use]
    pub fn offset_of<T: ListItem>(collection: &[T], id: &T::Id) -> Option<usize> {
        position_of(collection, id)
    }
}
