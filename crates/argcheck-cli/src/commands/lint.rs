use crate::support::{EXIT_REJECTED, load_manifest_or_exit, print_json};
use serde_json::json;
use std::path::PathBuf;

pub fn run(manifest_path: PathBuf, json_output: bool) {
    let manifest = load_manifest_or_exit(&manifest_path);
    let issues = manifest.lint();

    if json_output {
        print_json(&json!({
            "function": manifest.signature.name,
            "manifest": manifest_path.display().to_string(),
            "issueCount": issues.len(),
            "issues": issues,
        }));
    } else {
        println!("argcheck lint {}", manifest_path.display());
        println!("  Function: {}()", manifest.signature.name);
        println!("  Parameters: {}", manifest.signature.params.len());
        if issues.is_empty() {
            println!("  Issues: none");
        } else {
            println!("  Issues ({}):", issues.len());
            for issue in &issues {
                println!(
                    "    - [{}] {}: {}",
                    issue.failure_class, issue.path, issue.message
                );
            }
        }
    }

    if !issues.is_empty() {
        std::process::exit(EXIT_REJECTED);
    }
}
