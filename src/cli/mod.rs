//! Command-line interface for maestro.
//!
//! A thin wrapper over the resolver and the service directory, handy for
//! checking what the catalogue returns for a link.

mod commands;

pub use commands::{Cli, Commands, run_command};
