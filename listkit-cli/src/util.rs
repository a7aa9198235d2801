//! Shared utility functions used across command modules.

use std::path::{Path, PathBuf};

use listkit_core::config::CoordinatorSettings;
use listkit_core::payload::ListKind;

use crate::error::CliError;

/// Default settings location: `<config dir>/listkit/settings.toml`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("listkit").join("settings.toml"))
}

/// Loads settings from the path given on the command line.
///
/// An explicit path must exist. Without one, the default location is used
/// if present, and built-in defaults otherwise.
pub fn load_settings(config_path: Option<&Path>) -> Result<CoordinatorSettings, CliError> {
    if let Some(path) = config_path {
        return Ok(CoordinatorSettings::load(path)?);
    }
    match default_settings_path() {
        Some(path) if path.exists() => Ok(CoordinatorSettings::load(&path)?),
        _ => {
            tracing::debug!("No settings file, using defaults");
            Ok(CoordinatorSettings::default())
        }
    }
}

/// Resolves the payload prefix from `--prefix` or `--kind`
pub fn resolve_prefix(
    config_path: Option<&Path>,
    prefix: Option<&str>,
    kind: Option<ListKind>,
) -> Result<String, CliError> {
    match (prefix, kind) {
        (Some(prefix), _) if prefix.is_empty() => {
            Err(CliError::Usage("prefix must not be empty".to_string()))
        }
        (Some(prefix), _) => Ok(prefix.to_string()),
        (None, Some(kind)) => Ok(load_settings(config_path)?.prefix_for(kind)),
        (None, None) => Err(CliError::Usage(
            "either --prefix or --kind is required".to_string(),
        )),
    }
}
