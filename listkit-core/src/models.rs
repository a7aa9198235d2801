//! Core data structures shared by the coordinators
//!
//! The coordinators never own the host's backing collection. They read it as
//! a slice of [`ListItem`]s and emit instructions ([`MoveInstruction`],
//! [`InsertInstruction`]) that the host applies to its own storage.

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use uuid::Uuid;

/// An element of a host list with a stable, unique id
pub trait ListItem {
    /// Identifier type; must be unique within one collection
    type Id: Clone + Eq + Hash + Debug;

    /// Returns the element's id.
    fn id(&self) -> Self::Id;
}

impl ListItem for String {
    type Id = Self;

    fn id(&self) -> Self::Id {
        self.clone()
    }
}

impl ListItem for Uuid {
    type Id = Self;

    fn id(&self) -> Self::Id {
        *self
    }
}

/// Returns the position of `id` in `collection`, if present.
pub fn position_of<T: ListItem>(collection: &[T], id: &T::Id) -> Option<usize> {
    collection.iter().position(|item| item.id() == *id)
}

/// A reorder of rows within one collection
///
/// `destination` is expressed in the index space AFTER the rows at
/// `source_offsets` have been removed: the moved rows end up occupying
/// `destination..destination + source_offsets.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInstruction {
    /// Offsets of the rows being moved, in the pre-move collection
    pub source_offsets: BTreeSet<usize>,
    /// Insertion index in the post-removal collection
    pub destination: usize,
}

impl MoveInstruction {
    /// Creates a move of `source_offsets` to `destination`.
    #[must_use]
    pub fn new(source_offsets: impl IntoIterator<Item = usize>, destination: usize) -> Self {
        Self {
            source_offsets: source_offsets.into_iter().collect(),
            destination,
        }
    }

    /// Creates a move of a single row.
    #[must_use]
    pub fn single(offset: usize, destination: usize) -> Self {
        Self::new([offset], destination)
    }

    /// Builds a move from an insertion gap in the pre-removal index space.
    ///
    /// A gap `g` sits between rows `g - 1` and `g`; `0..=len` are valid gaps.
    #[must_use]
    pub fn from_gap(source_offsets: BTreeSet<usize>, gap: usize) -> Self {
        let shift = source_offsets.iter().filter(|&&offset| offset < gap).count();
        Self {
            destination: gap - shift,
            source_offsets,
        }
    }

    /// Returns true if applying this move leaves the order unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        if self.source_offsets.is_empty() {
            return true;
        }
        let contiguous = self
            .source_offsets
            .iter()
            .zip(self.source_offsets.iter().skip(1))
            .all(|(a, b)| b - a == 1);
        contiguous && self.source_offsets.first() == Some(&self.destination)
    }
}

/// Applies a [`MoveInstruction`] to a host vector.
///
/// Offsets past the end are ignored and the destination is clamped, so a
/// stale instruction never panics.
pub fn apply_move<T>(items: &mut Vec<T>, instruction: &MoveInstruction) {
    let mut moved = Vec::with_capacity(instruction.source_offsets.len());
    for &offset in instruction.source_offsets.iter().rev() {
        if offset < items.len() {
            moved.push(items.remove(offset));
        }
    }
    moved.reverse();

    let destination = instruction.destination.min(items.len());
    let tail = items.split_off(destination);
    items.extend(moved);
    items.extend(tail);
}

/// Ids arriving from another list, to be appended to the target list
///
/// Removal from the source list is that list's own responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertInstruction {
    /// Prefix of the list the ids came from
    pub source_prefix: String,
    /// Ids in source order
    pub ids: Vec<String>,
}
