//! Decode command.

use std::path::Path;

use listkit_core::payload::{ListKind, decode};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::resolve_prefix;

/// Prints the ids carried by `payload`, one per line
pub fn cmd_decode(
    config_path: Option<&Path>,
    prefix: Option<&str>,
    kind: Option<ListKind>,
    payload: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    let prefix = resolve_prefix(config_path, prefix, kind)?;
    let Some(ids) = decode(payload, &prefix) else {
        return Err(CliError::PrefixMismatch { expected: prefix });
    };

    match format {
        OutputFormat::Text => {
            for id in &ids {
                println!("{id}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
    }
    Ok(())
}
