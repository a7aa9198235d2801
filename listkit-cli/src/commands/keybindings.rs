//! Keybindings command.

use std::path::Path;

use listkit_core::config::{KeybindingCategory, default_keybindings};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::load_settings;

#[derive(Serialize)]
struct KeybindingRow<'a> {
    action: &'a str,
    label: &'a str,
    category: &'a str,
    accels: &'a str,
    overridden: bool,
}

/// Lists every binding with its effective accelerators
pub fn cmd_keybindings(config_path: Option<&Path>, format: OutputFormat) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let defs = default_keybindings();

    match format {
        OutputFormat::Text => {
            for &category in KeybindingCategory::all() {
                println!("{}:", category.label());
                for def in defs.iter().filter(|def| def.category == category) {
                    let accels = settings.keybindings.get_accel(def);
                    let marker = if settings.keybindings.overrides.contains_key(&def.action) {
                        " (custom)"
                    } else {
                        ""
                    };
                    println!("  {:<24} {:<28} {}{marker}", def.label, accels, def.action);
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<KeybindingRow<'_>> = defs
                .iter()
                .map(|def| KeybindingRow {
                    action: &def.action,
                    label: &def.label,
                    category: def.category.label(),
                    accels: settings.keybindings.get_accel(def),
                    overridden: settings.keybindings.overrides.contains_key(&def.action),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
