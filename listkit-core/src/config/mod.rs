//! Configuration for list coordinators
//!
//! This module provides [`CoordinatorSettings`], loaded from TOML, and the
//! keyboard command registry in [`keybindings`].

pub mod keybindings;
pub mod settings;

pub use keybindings::{
    KeybindingCategory, KeybindingDef, KeybindingSettings, ListCommand, default_keybindings,
    is_valid_accelerator,
};
pub use settings::{CoordinatorSettings, DebounceSettings, DragSettings};
