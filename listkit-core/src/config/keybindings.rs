//! Keyboard command configuration
//!
//! Provides [`KeybindingSettings`] for user-customizable list shortcuts,
//! [`KeybindingDef`] for the default registry and [`ListCommand`], the
//! commands a list coordinator understands.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::selection::Direction;

/// A keyboard command handled by a list coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListCommand {
    /// Select every row
    SelectAll,
    /// Remove the selected rows
    DeleteSelection,
    /// Move the selection one step
    Move(Direction),
    /// Hand focus to the next widget (Tab)
    FocusNext,
    /// Hand focus to the previous widget (Shift-Tab)
    FocusPrevious,
}

impl ListCommand {
    /// Returns the action name used in keybinding settings.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::SelectAll => "list.select-all",
            Self::DeleteSelection => "list.delete-selection",
            Self::Move(Direction::Up) => "list.move-up",
            Self::Move(Direction::Down) => "list.move-down",
            Self::Move(Direction::Left) => "list.move-left",
            Self::Move(Direction::Right) => "list.move-right",
            Self::FocusNext => "list.focus-next",
            Self::FocusPrevious => "list.focus-previous",
        }
    }

    /// Looks up a command by action name.
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        Self::all().iter().copied().find(|cmd| cmd.action() == action)
    }

    /// Returns all commands in registry order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::SelectAll,
            Self::DeleteSelection,
            Self::Move(Direction::Up),
            Self::Move(Direction::Down),
            Self::Move(Direction::Left),
            Self::Move(Direction::Right),
            Self::FocusNext,
            Self::FocusPrevious,
        ]
    }
}
/// User overrides of the default bindings, keyed by action name.
///
/// Values use the same `|`-separated accelerator syntax as
/// [`KeybindingDef::default_accels`]. An override replaces every default
/// accelerator of its action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindingSettings {
    /// `"list.move-down" -> "j|Down"`; absent actions keep their defaults
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<String, String>,
}

/// One entry of the default binding registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingDef {
    /// Action name, see [`ListCommand::action`]
    pub action: String,
    /// `|`-separated accelerators bound out of the box
    pub default_accels: String,
    /// Label shown by `listkit-cli keybindings`
    pub label: String,
    /// Group the binding is listed under
    pub category: KeybindingCategory,
}

/// Groups for listing bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindingCategory {
    /// Select all
    Selection,
    /// Arrow keys
    Navigation,
    /// Delete
    Editing,
    /// Tab / Shift-Tab
    Focus,
}

impl KeybindingCategory {
    /// Heading for this group
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Selection => "Selection",
            Self::Navigation => "Navigation",
            Self::Editing => "Editing",
            Self::Focus => "Focus",
        }
    }

    /// Every group, in listing order
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Selection, Self::Navigation, Self::Editing, Self::Focus]
    }
}

impl KeybindingDef {
    /// Registry entry for an arbitrary action name
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        default_accels: impl Into<String>,
        label: impl Into<String>,
        category: KeybindingCategory,
    ) -> Self {
        Self {
            action: action.into(),
            default_accels: default_accels.into(),
            label: label.into(),
            category,
        }
    }

    /// Registry entry for `command`, named after [`ListCommand::action`]
    #[must_use]
    pub fn for_command(
        command: ListCommand,
        default_accels: impl Into<String>,
        label: impl Into<String>,
        category: KeybindingCategory,
    ) -> Self {
        Self::new(command.action(), default_accels, label, category)
    }

    /// Default accelerators, one per entry
    #[must_use]
    pub fn default_accel_list(&self) -> Vec<&str> {
        split_accels(&self.default_accels).collect()
    }

    /// Command triggered by this entry, `None` for foreign action names
    #[must_use]
    pub fn command(&self) -> Option<ListCommand> {
        ListCommand::from_action(&self.action)
    }
}

fn split_accels(accels: &str) -> impl Iterator<Item = &str> {
    accels.split('|').map(str::trim).filter(|accel| !accel.is_empty())
}

impl KeybindingSettings {
    /// Effective accelerators of `def`: the override if present, else its defaults
    #[must_use]
    pub fn get_accel<'a>(&'a self, def: &'a KeybindingDef) -> &'a str {
        self.overrides
            .get(&def.action)
            .map_or(def.default_accels.as_str(), String::as_str)
    }

    /// True if any binding differs from the registry
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Restores the defaults of `action`
    pub fn reset(&mut self, action: &str) {
        self.overrides.remove(action);
    }

    /// Restores every default
    pub fn reset_all(&mut self) {
        self.overrides.clear();
    }

    /// Command bound to `accel` under these overrides.
    ///
    /// An accelerator rebound away from its default action no longer
    /// triggers that action.
    #[must_use]
    pub fn command_for_accel(&self, accel: &str) -> Option<ListCommand> {
        let accel = accel.trim();
        default_keybindings()
            .iter()
            .find(|def| split_accels(self.get_accel(def)).any(|bound| bound == accel))
            .and_then(KeybindingDef::command)
    }

    /// Overridden actions that are unknown or bound to a malformed
    /// accelerator, sorted
    #[must_use]
    pub fn invalid_overrides(&self) -> Vec<&str> {
        let mut invalid: Vec<&str> = self
            .overrides
            .iter()
            .filter(|(action, accels)| {
                ListCommand::from_action(action).is_none()
                    || !accels.split('|').all(is_valid_accelerator)
            })
            .map(|(action, _)| action.as_str())
            .collect();
        invalid.sort_unstable();
        invalid
    }
}

/// The built-in bindings, one entry per [`ListCommand`]
#[must_use]
pub fn default_keybindings() -> Vec<KeybindingDef> {
    use KeybindingCategory::{Editing, Focus, Navigation, Selection};

    const REGISTRY: &[(ListCommand, &str, &str, KeybindingCategory)] = &[
        (ListCommand::SelectAll, "<Control>a", "Select All", Selection),
        (ListCommand::Move(Direction::Up), "Up", "Move Up", Navigation),
        (ListCommand::Move(Direction::Down), "Down", "Move Down", Navigation),
        (ListCommand::Move(Direction::Left), "Left", "Move Left", Navigation),
        (ListCommand::Move(Direction::Right), "Right", "Move Right", Navigation),
        (ListCommand::DeleteSelection, "Delete|BackSpace", "Delete Selection", Editing),
        (ListCommand::FocusNext, "Tab", "Next Widget", Focus),
        (
            ListCommand::FocusPrevious,
            "<Shift>Tab|ISO_Left_Tab",
            "Previous Widget",
            Focus,
        ),
    ];

    REGISTRY
        .iter()
        .map(|&(command, accels, label, category)| {
            KeybindingDef::for_command(command, accels, label, category)
        })
        .collect()
}

/// Checks the shape of one accelerator: zero or more `<Modifier>` groups
/// followed by a key name, e.g. `"<Control><Shift>a"` or `"BackSpace"`.
#[must_use]
pub fn is_valid_accelerator(accel: &str) -> bool {
    let mut rest = accel.trim();
    while let Some(after_open) = rest.strip_prefix('<') {
        match after_open.find('>') {
            Some(end) if end > 0 => rest = &after_open[end + 1..],
            _ => return false,
        }
    }
    !rest.is_empty() && !rest.contains(['<', '>', '|'])
}
