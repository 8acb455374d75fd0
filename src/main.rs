//! Maestro command-line entry point.
//!
//! Resolves streaming links against the catalogue API from a terminal.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use maestro::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // RUST_LOG wins; otherwise info (debug with --verbose) for this crate
    let default_level = if args.verbose { "maestro=debug" } else { "maestro=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
