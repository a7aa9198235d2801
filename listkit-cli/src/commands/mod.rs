//! Command handlers for the listkit CLI.

mod decode;
mod encode;
mod keybindings;
mod replay;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

pub use decode::cmd_decode;
pub use encode::cmd_encode;
pub use keybindings::cmd_keybindings;
pub use replay::cmd_replay;

/// Routes a parsed command to its handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Encode { prefix, kind, ids } => {
            cmd_encode(config_path, prefix.as_deref(), kind, &ids)
        }
        Commands::Decode {
            prefix,
            kind,
            payload,
            format,
        } => cmd_decode(config_path, prefix.as_deref(), kind, &payload, format),
        Commands::Replay {
            items,
            kind,
            script,
            format,
        } => cmd_replay(config_path, items, kind, &script, format),
        Commands::Keybindings { format } => cmd_keybindings(config_path, format),
    }
}
