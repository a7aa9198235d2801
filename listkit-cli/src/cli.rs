//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use listkit_core::payload::ListKind;

/// `listkit` command-line interface for payloads and input replay
#[derive(Parser)]
#[command(name = "listkit-cli")]
#[command(author, version, about = "listkit command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a settings file (TOML)
    #[arg(short, long, global = true, env = "LISTKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Encode ids into a drag payload
    #[command(about = "Encode ids into a prefix-tagged drag payload")]
    Encode {
        /// Literal payload prefix (e.g. "WG|")
        #[arg(short, long, conflicts_with = "kind")]
        prefix: Option<String>,

        /// List kind whose configured prefix to use
        #[arg(short, long)]
        kind: Option<ListKind>,

        /// Ids to encode, in order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Decode a drag payload
    #[command(about = "Decode a drag payload, printing one id per line")]
    Decode {
        /// Expected payload prefix
        #[arg(short, long, conflicts_with = "kind")]
        prefix: Option<String>,

        /// List kind whose configured prefix is expected
        #[arg(short, long)]
        kind: Option<ListKind>,

        /// Payload string
        payload: String,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Replay a gesture script against a list
    #[command(about = "Replay a gesture script and print the resulting list and events")]
    Replay {
        /// Initial list contents, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        items: Vec<String>,

        /// Kind of the list being driven
        #[arg(short, long, default_value = "workflows")]
        kind: ListKind,

        /// Script file, or "-" for stdin
        script: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },

    /// Show keyboard bindings
    #[command(about = "Show effective keyboard bindings")]
    Keybindings {
        /// Output format
        #[arg(short, long, default_value = "text", value_enum)]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}
