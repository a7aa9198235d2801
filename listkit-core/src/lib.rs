//! `listkit` Core Library
//!
//! UI-toolkit-independent coordination for editable lists: multi-selection,
//! keyboard focus handoff, debounced change propagation, drag-to-reorder and
//! cross-list drag transfers. The host owns its collection and widgets; this
//! crate only turns gestures into instructions.
//!
//! # Crate Structure
//!
//! - [`selection`] - Tap, range, toggle and keyboard selection
//! - [`focus`] - Single-slot focus broadcast shared across lists
//! - [`debounce`] - Quiet-window debouncing on a pluggable scheduler
//! - [`reorder`] - Drag arithmetic and drop resolution
//! - [`payload`] - Prefix-tagged drag payload codec
//! - [`coordinator`] - Facade bundling the above for one list
//! - [`config`] - TOML settings and keybindings
//! - [`tracing`] - Subscriber setup and span/field names
//!
//! Everything here is single-threaded: coordinators hold `Rc`/`RefCell`
//! state and are `!Send`.

#![warn(missing_docs)]

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod focus;
pub mod models;
pub mod payload;
pub mod reorder;
pub mod selection;
pub mod tracing;

// Flat re-exports for tests and the CLI. Modular paths work too.

pub use config::{
    CoordinatorSettings, KeybindingCategory, KeybindingDef, KeybindingSettings, ListCommand,
    default_keybindings, is_valid_accelerator,
};
pub use coordinator::{CommandOutcome, FocusHandoff, ListCoordinator};
pub use debounce::{
    ChangeDebouncer, DEFAULT_QUIET_WINDOW, DebounceTimer, ManualScheduler, ManualTimer, Scheduler,
    TimerHandle, TokioScheduler,
};
pub use error::{ConfigError, ConfigResult};
pub use focus::{FocusBroker, SubscriptionId};
pub use models::{InsertInstruction, ListItem, MoveInstruction, apply_move, position_of};
pub use payload::{DragPayload, ListKind, SEPARATOR, decode, encode};
pub use reorder::{
    DragSession, DropConfig, DropOutcome, DropPosition, ReorderEngine, calculate_drop_position,
    calculate_indicator_y, calculate_row_index, candidate_gap, drop_gap,
};
pub use selection::{Direction, SelectionModifier, SelectionState, SelectionStore};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult,
    get_tracing_config, init_tracing, is_tracing_initialized, span_names,
};
