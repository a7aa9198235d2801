//! Coordinator settings
//!
//! Settings are read from a TOML document. Every section is optional; a
//! missing section falls back to its defaults.
//!
//! ```toml
//! [debounce]
//! quiet_window_ms = 150
//!
//! [drag]
//! row_height = 28.0
//!
//! [tags]
//! groups = "GRP|"
//!
//! [accepted_foreign_kinds]
//! groups = ["workflows"]
//!
//! [keybindings.overrides]
//! "list.move-down" = "j"
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::keybindings::KeybindingSettings;
use crate::debounce::DEFAULT_QUIET_WINDOW;
use crate::error::{ConfigError, ConfigResult};
use crate::payload::{ListKind, SEPARATOR};
use crate::reorder::{DropConfig, ReorderEngine};

/// Quiet-window settings for selection debouncing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceSettings {
    /// Milliseconds without changes before a selection settles
    pub quiet_window_ms: u64,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            quiet_window_ms: DEFAULT_QUIET_WINDOW.as_millis() as u64,
        }
    }
}

/// Row geometry for continuous drags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Row height in pixels
    pub row_height: f64,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            row_height: DropConfig::default().row_height,
        }
    }
}

/// Settings shared by every list coordinator of an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorSettings {
    /// Debounce timing
    pub debounce: DebounceSettings,
    /// Drag geometry
    pub drag: DragSettings,
    /// Payload prefix overrides, keyed by list kind name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Kinds whose payloads a list accepts as transfers, keyed by list kind name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub accepted_foreign_kinds: BTreeMap<String, Vec<String>>,
    /// Keyboard overrides
    pub keybindings: KeybindingSettings,
}

impl CoordinatorSettings {
    /// Parses and validates settings from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for unusable values.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, or any
    /// error from reading or [`Self::from_toml_str`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let _span = crate::trace_operation_debug!(
            crate::tracing::span_names::CONFIG_LOAD,
            path = %path.display()
        )
        .entered();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(
            quiet_window_ms = settings.debounce.quiet_window_ms,
            tags = settings.tags.len(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Writes settings to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("{}: {e}", path.display())))
    }

    /// Serializes settings to a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Checks every value for usability.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Validation`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.debounce.quiet_window_ms == 0 {
            return Err(ConfigError::invalid(
                "debounce.quiet_window_ms",
                "must be greater than zero",
            ));
        }
        if !self.drag.row_height.is_finite() || self.drag.row_height <= 0.0 {
            return Err(ConfigError::invalid(
                "drag.row_height",
                format!("must be a positive number, got {}", self.drag.row_height),
            ));
        }

        for (key, tag) in &self.tags {
            parse_kind(&format!("tags.{key}"), key)?;
            if tag.is_empty() {
                return Err(ConfigError::invalid(format!("tags.{key}"), "must not be empty"));
            }
            if tag.contains(SEPARATOR) {
                return Err(ConfigError::invalid(
                    format!("tags.{key}"),
                    format!("must not contain '{SEPARATOR}'"),
                ));
            }
        }
        let mut seen = HashSet::new();
        for kind in ListKind::all() {
            let prefix = self.prefix_for(*kind);
            if !seen.insert(prefix.clone()) {
                return Err(ConfigError::invalid(
                    format!("tags.{kind}"),
                    format!("prefix '{prefix}' is used by more than one list kind"),
                ));
            }
        }

        for (key, accepted) in &self.accepted_foreign_kinds {
            let field = format!("accepted_foreign_kinds.{key}");
            parse_kind(&field, key)?;
            for name in accepted {
                parse_kind(&field, name)?;
            }
        }

        if let Some(action) = self.keybindings.invalid_overrides().first() {
            return Err(ConfigError::invalid(
                format!("keybindings.overrides.{action}"),
                "unknown action or invalid accelerator",
            ));
        }
        Ok(())
    }

    /// Effective payload prefix for `kind`
    #[must_use]
    pub fn prefix_for(&self, kind: ListKind) -> String {
        self.tags
            .iter()
            .find(|(key, _)| ListKind::from_str(key).ok() == Some(kind))
            .map_or_else(|| kind.default_prefix().to_string(), |(_, tag)| tag.clone())
    }

    /// Prefixes a list of `kind` accepts as transfers
    #[must_use]
    pub fn accepted_prefixes_for(&self, kind: ListKind) -> Vec<String> {
        self.accepted_foreign_kinds
            .iter()
            .filter(|(key, _)| ListKind::from_str(key).ok() == Some(kind))
            .flat_map(|(_, names)| names.iter())
            .filter_map(|name| ListKind::from_str(name).ok())
            .filter(|foreign| *foreign != kind)
            .map(|foreign| self.prefix_for(foreign))
            .collect()
    }

    /// Builds the reorder engine for a list of `kind`
    #[must_use]
    pub fn reorder_engine(&self, kind: ListKind) -> ReorderEngine {
        ReorderEngine::new(self.prefix_for(kind))
            .with_accepted_prefixes(self.accepted_prefixes_for(kind))
    }

    /// Debounce quiet window
    #[must_use]
    pub const fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.debounce.quiet_window_ms)
    }

    /// Drag geometry
    #[must_use]
    pub const fn drop_config(&self) -> DropConfig {
        DropConfig {
            row_height: self.drag.row_height,
        }
    }
}

fn parse_kind(field: &str, name: &str) -> ConfigResult<ListKind> {
    ListKind::from_str(name).map_err(|reason| ConfigError::invalid(field, reason))
}
