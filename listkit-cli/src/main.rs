//! `listkit` CLI - drag payload encoding and gesture replay
//!
//! Encodes and decodes prefix-tagged drag payloads, lists the effective
//! keyboard bindings, and replays gesture scripts against a list
//! coordinator on a virtual clock.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use listkit_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let tracing_config = TracingConfig::new()
        .with_level(TracingLevel::from_verbosity(cli.verbose, cli.quiet))
        .with_targets(cli.verbose > 1);
    if let Err(e) = init_tracing(&tracing_config)
        && !cli.quiet
    {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
