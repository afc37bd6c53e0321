//! JSON manifests for argcheck guards.
//!
//! A manifest describes one guarded function as data: its signature and the
//! per-position type and value specifications in their mapping syntax.
//! [`check_call`] runs a call document through the guards and reports what
//! the function received or why the call was rejected.

pub mod error;
pub mod json;
pub mod manifest;
pub mod report;
pub mod spec;

pub use error::ManifestError;
pub use json::{value_from_json, value_to_json};
pub use manifest::{
    DUPLICATE_PARAMETER, Manifest, ManifestIssue, REQUIRED_AFTER_DEFAULT, SPEC_COUNT_MISMATCH,
};
pub use report::{CallDoc, CheckReport, Outcome, ReportedArgument, check_call};
pub use spec::{type_spec_from_json, value_spec_from_json};
