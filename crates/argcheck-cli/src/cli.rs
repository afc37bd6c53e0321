use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "argcheck",
    about = "argcheck: run calls through declarative type and value guards",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one call document through a manifest's guards
    Check {
        /// Path to the manifest JSON
        #[arg(long)]
        manifest: PathBuf,

        /// Path to the call document JSON (`{args, kwargs, removeChecks}`)
        #[arg(long)]
        call: PathBuf,

        /// Register the type guard disabled regardless of the manifest
        #[arg(long)]
        no_type_checks: bool,

        /// Register the value guard disabled regardless of the manifest
        #[arg(long)]
        no_value_checks: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report structural problems in a manifest
    Lint {
        /// Path to the manifest JSON
        #[arg(long)]
        manifest: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the English ordinal of each number
    Ordinal {
        /// Numbers to render (1 -> 1st, 12 -> 12th, ...)
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
}
