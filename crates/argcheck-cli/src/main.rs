//! argcheck CLI: the `argcheck` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            manifest,
            call,
            no_type_checks,
            no_value_checks,
            json,
        } => commands::check::run(commands::check::Args {
            manifest,
            call,
            no_type_checks,
            no_value_checks,
            json,
        }),

        Commands::Lint { manifest, json } => commands::lint::run(manifest, json),

        Commands::Ordinal { numbers } => commands::ordinal::run(numbers),
    }
}
