//! Host-facing facade for one editable list
//!
//! A [`ListCoordinator`] bundles the selection, focus, debounce and reorder
//! pieces for a single list. The host keeps its own collection and passes it
//! in on every call; the coordinator answers with instructions and fires the
//! registered callbacks.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::config::{CoordinatorSettings, KeybindingSettings, ListCommand};
use crate::debounce::{ChangeDebouncer, Scheduler, TokioScheduler};
use crate::focus::FocusBroker;
use crate::models::{InsertInstruction, ListItem, MoveInstruction};
use crate::payload::ListKind;
use crate::reorder::{DragSession, DropOutcome, DropPosition, ReorderEngine};
use crate::selection::{Direction, SelectionModifier, SelectionStore};
use crate::trace_operation_debug;
use crate::tracing::span_names;

/// Direction of a focus handoff out of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusHandoff {
    /// Tab
    Next,
    /// Shift-Tab
    Previous,
}

/// What a keyboard command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome<I> {
    /// The selection was replaced
    SelectionChanged,
    /// The selection moved to this id
    Moved(I),
    /// The host should remove these ids, then call [`ListCoordinator::prune`]
    Delete(Vec<I>),
    /// Focus should leave the list; the host performs the handoff
    FocusHandoff(FocusHandoff),
    /// Nothing to do
    Unhandled,
}

type CommitCallback = Box<dyn FnMut(&MoveInstruction)>;
type InsertCallback = Box<dyn FnMut(&InsertInstruction)>;
type SelectionListener<I> = Rc<RefCell<Option<Box<dyn FnMut(HashSet<I>)>>>>;

/// Coordinates selection, focus, debouncing and reordering for one list
pub struct ListCoordinator<T: ListItem, S: Scheduler = TokioScheduler> {
    kind: ListKind,
    engine: ReorderEngine,
    selection: SelectionStore<T::Id>,
    focus: FocusBroker<T::Id>,
    debouncer: ChangeDebouncer<HashSet<T::Id>, S>,
    selection_listener: SelectionListener<T::Id>,
    on_commit: Option<CommitCallback>,
    on_insert: Option<InsertCallback>,
    keybindings: KeybindingSettings,
    row_height: f64,
    vertical: bool,
    drag: Option<DragSession>,
}

impl<T: ListItem, S: Scheduler> fmt::Debug for ListCoordinator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCoordinator")
            .field("kind", &self.kind)
            .field("engine", &self.engine)
            .field("selection", &self.selection)
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, S> ListCoordinator<T, S>
where
    T: ListItem,
    T::Id: 'static,
    S: Scheduler,
    S::Handle: 'static,
{
    /// Creates a coordinator for a list of `kind`.
    ///
    /// `focus` is shared with the other coordinators of the same window.
    pub fn new(
        kind: ListKind,
        settings: &CoordinatorSettings,
        focus: FocusBroker<T::Id>,
        scheduler: S,
    ) -> Self {
        let selection_listener: SelectionListener<T::Id> = Rc::new(RefCell::new(None));
        let listener = Rc::clone(&selection_listener);
        let debouncer = ChangeDebouncer::new(
            HashSet::new(),
            settings.quiet_window(),
            scheduler,
            move |settled: HashSet<T::Id>| {
                if let Some(callback) = listener.borrow_mut().as_mut() {
                    callback(settled);
                }
            },
        );

        Self {
            kind,
            engine: settings.reorder_engine(kind),
            selection: SelectionStore::new(),
            focus,
            debouncer,
            selection_listener,
            on_commit: None,
            on_insert: None,
            keybindings: settings.keybindings.clone(),
            row_height: settings.drag.row_height,
            vertical: true,
            drag: None,
        }
    }

    /// Calls `callback` with every committed reorder
    #[must_use]
    pub fn on_commit(mut self, callback: impl FnMut(&MoveInstruction) + 'static) -> Self {
        self.on_commit = Some(Box::new(callback));
        self
    }

    /// Calls `callback` with every accepted transfer from another list
    #[must_use]
    pub fn on_insert(mut self, callback: impl FnMut(&InsertInstruction) + 'static) -> Self {
        self.on_insert = Some(Box::new(callback));
        self
    }

    /// Calls `callback` with the selection once it has settled
    #[must_use]
    pub fn on_selection_changed(self, callback: impl FnMut(HashSet<T::Id>) + 'static) -> Self {
        *self.selection_listener.borrow_mut() = Some(Box::new(callback));
        self
    }

    /// Opens the list with `id` selected; [`Self::reset`] returns to it
    #[must_use]
    pub fn with_initial_selection(mut self, id: T::Id) -> Self {
        self.selection = SelectionStore::with_initial(id);
        self
    }

    /// Lays the list out horizontally (Left/Right navigate)
    #[must_use]
    pub const fn horizontal(mut self) -> Self {
        self.vertical = false;
        self
    }

    /// List kind
    #[must_use]
    pub const fn kind(&self) -> ListKind {
        self.kind
    }

    /// Reorder engine built from the settings
    #[must_use]
    pub const fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionStore<T::Id> {
        &self.selection
    }

    /// Shared focus broker
    #[must_use]
    pub const fn focus(&self) -> &FocusBroker<T::Id> {
        &self.focus
    }

    /// Returns true while a selection change waits for its quiet window
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Resolves a tap on `element`
    pub fn tap(&mut self, collection: &[T], element: &T, modifier: SelectionModifier) {
        let _span =
            trace_operation_debug!(span_names::SELECTION_TAP, list_kind = %self.kind).entered();
        if !collection.iter().any(|item| item.id() == element.id()) {
            tracing::trace!("Tap outside the collection ignored");
            return;
        }
        self.selection.handle_tap(collection, element, modifier);
        self.selection_changed();
    }

    /// Selects every row
    pub fn select_all(&mut self, collection: &[T]) {
        self.selection.select_all(collection);
        self.selection_changed();
    }

    /// Moves the selection one step; returns the newly selected id
    pub fn navigate(&mut self, direction: Direction, collection: &[T]) -> Option<T::Id> {
        let _span = trace_operation_debug!(
            span_names::SELECTION_NAVIGATE,
            list_kind = %self.kind,
            ?direction
        )
        .entered();
        let id = self.selection.handle(direction, collection, self.vertical)?;
        self.selection_changed();
        Some(id)
    }

    /// Ids the host should remove, in collection order
    #[must_use]
    pub fn delete_selection(&self, collection: &[T]) -> Vec<T::Id> {
        self.selection.delete_selection(collection)
    }

    /// Drops selections whose rows are gone
    pub fn prune(&mut self, collection: &[T]) {
        let before = self.selection.selection_count();
        self.selection.prune(collection);
        if self.selection.selection_count() != before {
            self.selection_changed();
        }
    }

    /// Restores the initial selection
    pub fn reset(&mut self) {
        self.selection.reset();
        self.selection_changed();
    }

    /// Row height used for the next drag, in pixels
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Uses the row height the host measured instead of `drag.row_height`.
    ///
    /// Takes effect on the next [`Self::begin_drag`]. Returns false and keeps
    /// the current height if `height` is not a positive finite number.
    pub fn set_row_height(&mut self, height: f64) -> bool {
        if !height.is_finite() || height <= 0.0 {
            tracing::trace!(height, "Unusable row height ignored");
            return false;
        }
        self.row_height = height;
        true
    }

    /// Starts a continuous drag on the row at `index`
    ///
    /// Returns false if `index` is out of range. A drag already in progress is
    /// replaced.
    pub fn begin_drag(&mut self, collection: &[T], index: usize) -> bool {
        let _span = trace_operation_debug!(
            span_names::REORDER_DRAG,
            list_kind = %self.kind,
            index,
            row_height = self.row_height
        )
        .entered();
        self.drag = self
            .engine
            .begin_drag(collection, index, self.row_height, &self.selection);
        if self.drag.is_some() {
            tracing::debug!("Drag started");
        }
        self.drag.is_some()
    }

    /// Follows the pointer; returns the candidate gap
    pub fn update_drag(&mut self, translation: f64) -> Option<usize> {
        self.drag.as_mut()?.update(translation)
    }

    /// Y position of the placement indicator for the current drag
    #[must_use]
    pub fn drag_indicator_y(&self) -> Option<f64> {
        self.drag.as_ref()?.indicator_y()
    }

    /// Returns true while a drag is in progress
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Ends the drag, committing the move if there is one
    pub fn end_drag(&mut self) -> Option<MoveInstruction> {
        let _span =
            trace_operation_debug!(span_names::REORDER_DRAG, list_kind = %self.kind).entered();
        let instruction = self.drag.take()?.finish()?;
        tracing::debug!(destination = instruction.destination, "Drag committed");
        if let Some(callback) = self.on_commit.as_mut() {
            callback(&instruction);
        }
        Some(instruction)
    }

    /// Abandons the drag without committing
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Encodes the payload for a drag starting on `dragged`
    #[must_use]
    pub fn drag_payload(&self, collection: &[T], dragged: &T) -> String
    where
        T::Id: Display,
    {
        self.engine.drag_payload(collection, dragged, &self.selection)
    }

    /// Resolves a dropped payload and fires the matching callback
    pub fn drop_payload(
        &mut self,
        collection: &[T],
        payload: &str,
        target: usize,
        position: DropPosition,
    ) -> DropOutcome
    where
        T::Id: Display,
    {
        let _span = trace_operation_debug!(
            span_names::REORDER_DROP,
            list_kind = %self.kind,
            target
        )
        .entered();
        let outcome = self
            .engine
            .drop_payload(collection, payload, target, position);
        match &outcome {
            DropOutcome::Reorder(instruction) => {
                if let Some(callback) = self.on_commit.as_mut() {
                    callback(instruction);
                }
            }
            DropOutcome::Insert(instruction) => {
                if let Some(callback) = self.on_insert.as_mut() {
                    callback(instruction);
                }
            }
            DropOutcome::Ignored => {}
        }
        outcome
    }

    /// Executes a keyboard command
    pub fn handle_command(
        &mut self,
        command: ListCommand,
        collection: &[T],
    ) -> CommandOutcome<T::Id> {
        let _span = trace_operation_debug!(
            span_names::COMMAND_HANDLE,
            command = command.action()
        )
        .entered();
        match command {
            ListCommand::SelectAll if collection.is_empty() => CommandOutcome::Unhandled,
            ListCommand::SelectAll => {
                self.select_all(collection);
                CommandOutcome::SelectionChanged
            }
            ListCommand::DeleteSelection => {
                let ids = self.delete_selection(collection);
                if ids.is_empty() {
                    CommandOutcome::Unhandled
                } else {
                    CommandOutcome::Delete(ids)
                }
            }
            ListCommand::Move(direction) => self
                .navigate(direction, collection)
                .map_or(CommandOutcome::Unhandled, CommandOutcome::Moved),
            ListCommand::FocusNext => CommandOutcome::FocusHandoff(FocusHandoff::Next),
            ListCommand::FocusPrevious => CommandOutcome::FocusHandoff(FocusHandoff::Previous),
        }
    }

    /// Executes the command bound to `accel`, if any
    pub fn handle_accel(&mut self, accel: &str, collection: &[T]) -> CommandOutcome<T::Id> {
        match self.keybindings.command_for_accel(accel) {
            Some(command) => self.handle_command(command, collection),
            None => CommandOutcome::Unhandled,
        }
    }

    fn selection_changed(&self) {
        if let Some(active) = self.selection.last_selection() {
            self.focus.publish(active.clone());
        }
        self.debouncer.process(self.selection.selections().clone());
    }
}
