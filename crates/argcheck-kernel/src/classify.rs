//! Type Classifier: checks the runtime kind of one argument against its
//! declared Type Specification.
//!
//! A specification is built from an optional kind rule and an optional
//! consistency directive:
//!
//! ```text
//! TypeSpec::exact(Kind::Str)                         bare kind
//! TypeSpec::any_of([Kind::Int, Kind::Float])         kind set
//! TypeSpec::any_of([Kind::List, Kind::Tuple])        structured: rule
//!     .with_consistency(Consistency::restricted_to([Kind::Int]))  + directive
//! ```
//!
//! When a position carries no directive of its own, the guard-level
//! default applies (see [`crate::guard::TypeGuardOptions`]).

use crate::error::CheckError;
use crate::ordinal::ordinal;
use crate::value::{Kind, Value, format_kinds};
use serde::{Deserialize, Serialize};

/// Which kinds an argument may have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRule {
    Exact(Kind),
    AnyOf(Vec<Kind>),
}

/// Element-kind homogeneity for list and tuple arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consistency {
    pub enabled: bool,
    /// When set, the single element kind must be one of these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_kinds: Option<Vec<Kind>>,
}

impl Consistency {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            element_kinds: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            element_kinds: None,
        }
    }

    pub fn restricted_to(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            enabled: true,
            element_kinds: Some(kinds.into_iter().collect()),
        }
    }
}

/// Declared Type Specification for one argument position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<TypeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
}

impl TypeSpec {
    /// Accept any kind.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn exact(kind: Kind) -> Self {
        Self {
            rule: Some(TypeRule::Exact(kind)),
            consistency: None,
        }
    }

    pub fn any_of(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            rule: Some(TypeRule::AnyOf(kinds.into_iter().collect())),
            consistency: None,
        }
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn without_consistency(self) -> Self {
        self.with_consistency(Consistency::disabled())
    }
}

impl From<Kind> for TypeSpec {
    fn from(kind: Kind) -> Self {
        Self::exact(kind)
    }
}

/// Check one argument against its Type Specification.
///
/// `position` is zero-based; messages use its 1-based ordinal.
/// `default_consistency` is the directive applied when `spec` carries none.
pub fn check_type(
    position: usize,
    value: &Value,
    spec: &TypeSpec,
    function: &str,
    default_consistency: &Consistency,
) -> Result<(), CheckError> {
    let kind = value.kind();
    let ord = ordinal(position + 1);

    match &spec.rule {
        Some(TypeRule::AnyOf(kinds)) if !kinds.contains(&kind) => {
            return Err(type_error(
                position,
                function,
                format!(
                    "The type of the {ord} argument of function {function}() does not belong in {}",
                    format_kinds(kinds)
                ),
            ));
        }
        Some(TypeRule::Exact(expected)) if *expected != kind => {
            return Err(type_error(
                position,
                function,
                format!("The {ord} argument of the function {function}() is not a {expected}"),
            ));
        }
        _ => {}
    }

    let consistency = spec.consistency.as_ref().unwrap_or(default_consistency);
    if !consistency.enabled {
        return Ok(());
    }
    let Some(elements) = value.elements() else {
        return Ok(());
    };

    let element_kinds = distinct_kinds(elements);
    match element_kinds.as_slice() {
        [] => Ok(()),
        [single] => match &consistency.element_kinds {
            Some(allowed) if !allowed.contains(single) => Err(type_error(
                position,
                function,
                format!(
                    "Each element of the {ord} variable must have the same type. Allowed types: {}.",
                    format_kinds(allowed)
                ),
            )),
            _ => Ok(()),
        },
        _ => Err(type_error(
            position,
            function,
            format!("Each element of the {ord} variable must have the same type."),
        )),
    }
}

/// Element kinds in first-seen order, without repeats.
fn distinct_kinds(elements: &[Value]) -> Vec<Kind> {
    let mut kinds = Vec::new();
    for element in elements {
        let kind = element.kind();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

fn type_error(position: usize, function: &str, message: String) -> CheckError {
    CheckError::TypeKind {
        position,
        function: function.to_string(),
        message,
    }
}
