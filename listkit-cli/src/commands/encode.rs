//! Encode command.

use std::path::Path;

use listkit_core::payload::{ListKind, SEPARATOR, encode};

use crate::error::CliError;
use crate::util::resolve_prefix;

/// Prints the payload for `ids` under the resolved prefix
pub fn cmd_encode(
    config_path: Option<&Path>,
    prefix: Option<&str>,
    kind: Option<ListKind>,
    ids: &[String],
) -> Result<(), CliError> {
    let prefix = resolve_prefix(config_path, prefix, kind)?;
    if let Some(bad) = ids.iter().find(|id| id.is_empty() || id.contains(SEPARATOR)) {
        return Err(CliError::Usage(format!(
            "id '{bad}' is empty or contains '{SEPARATOR}'"
        )));
    }

    println!("{}", encode(&prefix, ids));
    Ok(())
}
