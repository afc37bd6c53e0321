use crate::support::{
    EXIT_BAD_INPUT, EXIT_REJECTED, load_call_or_exit, load_manifest_or_exit, print_json,
};
use argcheck_manifest::check_call;
use std::path::PathBuf;
use tracing::debug;

pub struct Args {
    pub manifest: PathBuf,
    pub call: PathBuf,
    pub no_type_checks: bool,
    pub no_value_checks: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let mut manifest = load_manifest_or_exit(&args.manifest);
    if args.no_type_checks {
        manifest.type_options.types_check_enabled = false;
    }
    if args.no_value_checks {
        manifest.value_options.value_check_enabled = false;
    }

    let call = load_call_or_exit(&args.call).to_call().unwrap_or_else(|e| {
        eprintln!("error: call {}: {e}", args.call.display());
        std::process::exit(EXIT_BAD_INPUT);
    });
    debug!(
        function = %manifest.signature.name,
        bypass = call.bypasses_checks(),
        "running call"
    );

    let report = check_call(&manifest, call);

    if args.json {
        print_json(&report);
    } else {
        println!("argcheck check {}()", report.function);
        match (&report.arguments, &report.violation) {
            (Some(arguments), _) => {
                println!("  Result: accepted");
                for argument in arguments {
                    println!("    {} = {}", argument.name, argument.value);
                }
            }
            (None, Some(violation)) => {
                println!("  Result: rejected ({:?})", violation.kind);
                println!("  {}", violation.message);
            }
            (None, None) => println!("  Result: rejected"),
        }
    }

    if !report.accepted() {
        std::process::exit(EXIT_REJECTED);
    }
}
