use crate::error::ManifestError;
use crate::json::value_from_json;
use crate::spec::{type_spec_from_json, value_spec_from_json};
use argcheck_kernel::{
    Arguments, Function, Param, Signature, TypeGuard, TypeGuardOptions, TypeSpec, ValueGuard,
    ValueGuardOptions, ValueSpec, accepted_types, accepted_values,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeSet;
use std::path::Path;

pub const SPEC_COUNT_MISMATCH: &str = "spec_count_mismatch";
pub const DUPLICATE_PARAMETER: &str = "duplicate_parameter";
pub const REQUIRED_AFTER_DEFAULT: &str = "required_after_default";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawManifest {
    function: String,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    params: Vec<RawParam>,
    #[serde(default)]
    types: Option<Vec<Json>>,
    #[serde(default)]
    values: Option<Vec<Json>>,
    #[serde(default = "enabled")]
    types_check_enabled: bool,
    #[serde(default = "enabled")]
    object_consistency_check: bool,
    #[serde(default = "enabled")]
    value_check_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParam {
    name: String,
    /// `Some(Null)` is a default of `None`; a missing key is no default.
    #[serde(default, deserialize_with = "present")]
    default: Option<Json>,
}

fn enabled() -> bool {
    true
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Json>, D::Error> {
    Json::deserialize(deserializer).map(Some)
}

/// A guarded function described as data: its signature, the per-position
/// specifications and the registration switches of both guards.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub signature: Signature,
    /// `None` when the manifest declares no type guard.
    pub types: Option<Vec<TypeSpec>>,
    /// `None` when the manifest declares no value guard.
    pub values: Option<Vec<ValueSpec>>,
    pub type_options: TypeGuardOptions,
    pub value_options: ValueGuardOptions,
}

/// A structural problem found by [`Manifest::lint`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestIssue {
    pub failure_class: String,
    pub path: String,
    pub message: String,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn from_value(json: Json) -> Result<Self, ManifestError> {
        let raw: RawManifest = serde_json::from_value(json)?;
        Self::from_raw(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn from_raw(raw: RawManifest) -> Result<Self, ManifestError> {
        let mut signature = Signature::new(raw.function);
        signature.doc = raw.doc;
        for (i, param) in raw.params.into_iter().enumerate() {
            let default = param
                .default
                .map(|json| value_from_json(&json, &format!("params[{i}].default")))
                .transpose()?;
            signature.params.push(Param {
                name: param.name,
                default,
            });
        }

        let types = raw
            .types
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| type_spec_from_json(entry, &format!("types[{i}]")))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        let values = raw
            .values
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| value_spec_from_json(entry, &format!("values[{i}]")))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            signature,
            types,
            values,
            type_options: TypeGuardOptions {
                types_check_enabled: raw.types_check_enabled,
                object_consistency_check: raw.object_consistency_check,
            },
            value_options: ValueGuardOptions {
                value_check_enabled: raw.value_check_enabled,
            },
        })
    }

    /// Register `body` under both guards. Type checks run first; a missing
    /// `types` or `values` section registers that guard disabled.
    pub fn guard<F, R>(&self, body: F) -> TypeGuard<ValueGuard<Function<F>>>
    where
        F: Fn(Arguments) -> R,
    {
        let function = Function::new(self.signature.clone(), body);
        let values = accepted_values(
            function,
            self.values.clone().unwrap_or_default(),
            ValueGuardOptions {
                value_check_enabled: self.value_options.value_check_enabled
                    && self.values.is_some(),
            },
        );
        accepted_types(
            values,
            self.types.clone().unwrap_or_default(),
            TypeGuardOptions {
                types_check_enabled: self.type_options.types_check_enabled
                    && self.types.is_some(),
                ..self.type_options
            },
        )
    }

    pub fn lint(&self) -> Vec<ManifestIssue> {
        let mut issues = Vec::new();
        let params = &self.signature.params;

        for (section, count) in [
            ("types", self.types.as_ref().map(Vec::len)),
            ("values", self.values.as_ref().map(Vec::len)),
        ] {
            if let Some(count) = count
                && count != params.len()
            {
                issues.push(ManifestIssue {
                    failure_class: SPEC_COUNT_MISMATCH.to_string(),
                    path: section.to_string(),
                    message: format!(
                        "{count} specifications for {} declared parameters",
                        params.len()
                    ),
                });
            }
        }

        let mut seen = BTreeSet::new();
        for (i, param) in params.iter().enumerate() {
            if !seen.insert(param.name.as_str()) {
                issues.push(ManifestIssue {
                    failure_class: DUPLICATE_PARAMETER.to_string(),
                    path: format!("params[{i}].name"),
                    message: format!("parameter `{}` is declared more than once", param.name),
                });
            }
        }

        if let Some(first_default) = params.iter().position(|p| p.default.is_some()) {
            for (i, param) in params.iter().enumerate().skip(first_default) {
                if param.default.is_none() {
                    issues.push(ManifestIssue {
                        failure_class: REQUIRED_AFTER_DEFAULT.to_string(),
                        path: format!("params[{i}]"),
                        message: format!(
                            "required parameter `{}` follows a parameter with a default",
                            param.name
                        ),
                    });
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argcheck_kernel::{Call, Kind, Operation, Value};
    use serde_json::json;

    fn manifest(json: Json) -> Manifest {
        Manifest::from_value(json).unwrap()
    }

    #[test]
    fn parses_signature_and_switches() {
        let m = manifest(json!({
            "function": "func3",
            "doc": "three inputs",
            "params": [
                {"name": "input1"},
                {"name": "input2", "default": 2.0},
                {"name": "input3", "default": null}
            ],
            "types": ["int", "float", ["float", "None"]],
            "objectConsistencyCheck": false
        }));
        assert_eq!(m.signature.name, "func3");
        assert_eq!(m.signature.doc.as_deref(), Some("three inputs"));
        assert_eq!(m.signature.params[0].default, None);
        assert_eq!(m.signature.params[1].default, Some(Value::Float(2.0)));
        assert_eq!(m.signature.params[2].default, Some(Value::None));
        assert_eq!(m.types.as_ref().map(Vec::len), Some(3));
        assert_eq!(m.values, None);
        assert!(m.type_options.types_check_enabled);
        assert!(!m.type_options.object_consistency_check);
        assert!(m.value_options.value_check_enabled);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Manifest::from_value(json!({"function": "f", "typo": 1})).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
    }

    #[test]
    fn guard_runs_type_checks_before_value_checks() {
        let m = manifest(json!({
            "function": "f",
            "params": [{"name": "x"}],
            "types": ["int"],
            "values": [{"range": [1, 10]}]
        }));
        let f = m.guard(|args| args.len());
        let err = f.invoke(Call::new().arg("eleven")).unwrap_err();
        assert_eq!(err.kind(), argcheck_kernel::ErrorKind::TypeKind);
        let err = f.invoke(Call::new().arg(11)).unwrap_err();
        assert_eq!(err.kind(), argcheck_kernel::ErrorKind::ValueConstraint);
        assert_eq!(f.invoke(Call::new().arg(3)).unwrap(), 1);
    }

    #[test]
    fn missing_sections_register_disabled_guards() {
        let m = manifest(json!({"function": "f", "params": [{"name": "x"}]}));
        let f = m.guard(|_| ());
        assert!(!f.is_enabled());
        assert!(!f.inner().is_enabled());
        assert_eq!(f.signature().name, "f");
    }

    #[test]
    fn lint_reports_structural_problems() {
        let m = manifest(json!({
            "function": "f",
            "params": [
                {"name": "a", "default": 1},
                {"name": "b"},
                {"name": "a"}
            ],
            "types": ["int", "int"],
            "values": [{}, {}, {}]
        }));
        let issues = serde_json::to_value(m.lint()).unwrap();
        insta::assert_json_snapshot!(issues, @r###"
        [
          {
            "failureClass": "spec_count_mismatch",
            "path": "types",
            "message": "2 specifications for 3 declared parameters"
          },
          {
            "failureClass": "duplicate_parameter",
            "path": "params[2].name",
            "message": "parameter `a` is declared more than once"
          },
          {
            "failureClass": "required_after_default",
            "path": "params[1]",
            "message": "required parameter `b` follows a parameter with a default"
          },
          {
            "failureClass": "required_after_default",
            "path": "params[2]",
            "message": "required parameter `a` follows a parameter with a default"
          }
        ]
        "###);
    }

    #[test]
    fn clean_manifest_has_no_issues() {
        let m = manifest(json!({
            "function": "f",
            "params": [{"name": "a"}, {"name": "b", "default": 1}],
            "types": [["int", "float"], "int"],
            "values": [{}, {"minValue": 0}]
        }));
        assert!(m.lint().is_empty());
        assert_eq!(
            m.types.map(|t| t[1].clone()),
            Some(TypeSpec::exact(Kind::Int))
        );
    }
}
