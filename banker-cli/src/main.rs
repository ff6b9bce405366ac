//! ## banker-cli
//! **Command line frontend for the request evaluator**
//!
//! The report goes to stdout only when evaluation succeeds. Logs, metrics and
//! errors go to stderr, and any error exits with a non-zero status.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)
}
