use argcheck_manifest::{CallDoc, Manifest};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`ARGCHECK_LOG=debug`).
pub const LOG_ENV: &str = "ARGCHECK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Exit status for input the CLI cannot use.
pub const EXIT_BAD_INPUT: i32 = 2;
/// Exit status for a rejected call or a manifest with issues.
pub const EXIT_REJECTED: i32 = 1;

/// Logs go to stderr so `--json` output stays parseable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_manifest_or_exit(path: &Path) -> Manifest {
    Manifest::load(path).unwrap_or_else(|e| {
        eprintln!("error: manifest {}: {e}", path.display());
        std::process::exit(EXIT_BAD_INPUT);
    })
}

pub fn load_call_or_exit(path: &Path) -> CallDoc {
    CallDoc::load(path).unwrap_or_else(|e| {
        eprintln!("error: call {}: {e}", path.display());
        std::process::exit(EXIT_BAD_INPUT);
    })
}

pub fn print_json<T: Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to render JSON: {e}");
            std::process::exit(EXIT_BAD_INPUT);
        }
    }
}
