use crate::error::ManifestError;
use crate::json::{value_from_json, value_to_json};
use crate::manifest::Manifest;
use argcheck_kernel::{Arguments, Call, Operation, REMOVE_CHECKS, Violation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::path::Path;
use tracing::debug;

/// One call to run through a manifest's guards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CallDoc {
    #[serde(default)]
    pub args: Vec<Json>,
    #[serde(default)]
    pub kwargs: Map<String, Json>,
    #[serde(default)]
    pub remove_checks: Option<bool>,
}

impl CallDoc {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn to_call(&self) -> Result<Call, ManifestError> {
        let mut call = Call::new();
        for (i, arg) in self.args.iter().enumerate() {
            call = call.arg(value_from_json(arg, &format!("args[{i}]"))?);
        }
        for (name, arg) in &self.kwargs {
            if name == REMOVE_CHECKS {
                return Err(ManifestError::invalid(
                    format!("kwargs.{name}"),
                    "reserved keyword; use the top-level `removeChecks` field",
                ));
            }
            call = call.kwarg(name.clone(), value_from_json(arg, &format!("kwargs.{name}"))?);
        }
        if let Some(flag) = self.remove_checks {
            call = call.kwarg(REMOVE_CHECKS, flag);
        }
        Ok(call)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Rejected,
}

/// One argument as the guarded function received it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedArgument {
    pub position: usize,
    pub name: String,
    pub value: Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub function: String,
    pub result: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<ReportedArgument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
}

impl CheckReport {
    pub fn accepted(&self) -> bool {
        self.result == Outcome::Accepted
    }
}

/// Run `call` through the manifest's guards around a function that echoes
/// the arguments it receives, folded arrays included.
pub fn check_call(manifest: &Manifest, call: Call) -> CheckReport {
    let echo = manifest.guard(|args: Arguments| {
        args.into_entries()
            .into_iter()
            .map(|entry| ReportedArgument {
                position: entry.position,
                name: entry.name,
                value: value_to_json(&entry.value),
            })
            .collect::<Vec<_>>()
    });

    let function = manifest.signature.name.clone();
    match echo.invoke(call) {
        Ok(arguments) => CheckReport {
            function,
            result: Outcome::Accepted,
            arguments: Some(arguments),
            violation: None,
        },
        Err(err) => {
            debug!(function = %function, error = %err, "call rejected");
            CheckReport {
                function,
                result: Outcome::Rejected,
                arguments: None,
                violation: Some(err.violation()),
            }
        }
    }
}
