//! The mapping syntax for specifications.
//!
//! Type entries are a kind name, a list of kind names, or an object
//! `{"type": ..., "command": {"checkConsistency": .., "consistencyType": ..}}`.
//! Value entries are objects keyed by constraint name (`range`, `minValue`,
//! `rowsRange`, ...) plus an optional `command` of `noCheck` or `allowNone`.

use crate::error::ManifestError;
use crate::json::value_from_json;
use argcheck_kernel::{
    Bound, Consistency, Constraint, Directive, Kind, Number, TypeRule, TypeSpec, ValueSpec,
};
use serde_json::{Map, Value as Json};
use tracing::debug;

pub fn type_spec_from_json(json: &Json, path: &str) -> Result<TypeSpec, ManifestError> {
    match json {
        Json::Null => Ok(TypeSpec::any()),
        Json::String(_) | Json::Array(_) => Ok(TypeSpec {
            rule: Some(type_rule(json, path)?),
            consistency: None,
        }),
        Json::Object(map) => structured_type_spec(map, path),
        _ => Err(ManifestError::invalid(
            path,
            "expected a kind name, a list of kind names or an object",
        )),
    }
}

fn structured_type_spec(map: &Map<String, Json>, path: &str) -> Result<TypeSpec, ManifestError> {
    let mut spec = TypeSpec::any();
    for (key, entry) in map {
        let entry_path = format!("{path}.{key}");
        match key.as_str() {
            "type" => spec.rule = Some(type_rule(entry, &entry_path)?),
            "command" => spec.consistency = consistency(entry, &entry_path)?,
            _ => {
                return Err(ManifestError::invalid(
                    entry_path,
                    "unknown key (expected `type` or `command`)",
                ));
            }
        }
    }
    Ok(spec)
}

fn type_rule(json: &Json, path: &str) -> Result<TypeRule, ManifestError> {
    match json {
        Json::String(name) => kind(name, path).map(TypeRule::Exact),
        Json::Array(_) => kind_list(json, path).map(TypeRule::AnyOf),
        _ => Err(ManifestError::invalid(
            path,
            "expected a kind name or a list of kind names",
        )),
    }
}

fn kind(name: &str, path: &str) -> Result<Kind, ManifestError> {
    name.parse().map_err(|e: String| ManifestError::invalid(path, e))
}

fn kind_list(json: &Json, path: &str) -> Result<Vec<Kind>, ManifestError> {
    match json {
        Json::String(name) => Ok(vec![kind(name, path)?]),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = format!("{path}[{i}]");
                match item {
                    Json::String(name) => kind(name, &item_path),
                    _ => Err(ManifestError::invalid(item_path, "expected a kind name")),
                }
            })
            .collect(),
        _ => Err(ManifestError::invalid(
            path,
            "expected a kind name or a list of kind names",
        )),
    }
}

/// `consistencyType` only takes effect next to `checkConsistency`.
fn consistency(json: &Json, path: &str) -> Result<Option<Consistency>, ManifestError> {
    let Json::Object(command) = json else {
        return Err(ManifestError::invalid(path, "must be an object"));
    };
    if let Some(key) = command
        .keys()
        .find(|k| !matches!(k.as_str(), "checkConsistency" | "consistencyType"))
    {
        return Err(ManifestError::invalid(
            format!("{path}.{key}"),
            "unknown command (expected `checkConsistency` or `consistencyType`)",
        ));
    }

    let element_kinds = command
        .get("consistencyType")
        .map(|kinds| kind_list(kinds, &format!("{path}.consistencyType")))
        .transpose()?;

    match command.get("checkConsistency") {
        Some(Json::Bool(enabled)) => Ok(Some(Consistency {
            enabled: *enabled,
            element_kinds,
        })),
        Some(_) => Err(ManifestError::invalid(
            format!("{path}.checkConsistency"),
            "must be a boolean",
        )),
        None => {
            if element_kinds.is_some() {
                debug!(path, "consistencyType without checkConsistency is ignored");
            }
            Ok(None)
        }
    }
}

pub fn value_spec_from_json(json: &Json, path: &str) -> Result<ValueSpec, ManifestError> {
    let map = match json {
        Json::Null => return Ok(ValueSpec::new()),
        Json::Object(map) => map,
        _ => return Err(ManifestError::invalid(path, "must be an object")),
    };

    let mut spec = ValueSpec::new();
    for (key, entry) in map {
        let entry_path = format!("{path}.{key}");
        let constraint = match key.as_str() {
            "command" => {
                spec.directive = Some(directive(entry, &entry_path)?);
                continue;
            }
            "range" => {
                let (low, high) = number_pair(entry, &entry_path)?;
                Constraint::Value(Bound::Range(low, high))
            }
            "minValue" => Constraint::Value(Bound::Min(number(entry, &entry_path)?)),
            "maxValue" => Constraint::Value(Bound::Max(number(entry, &entry_path)?)),
            "set" => Constraint::Set(members(entry, &entry_path)?),
            "minLength" => Constraint::Length(Bound::Min(count(entry, &entry_path)?)),
            "maxLength" => Constraint::Length(Bound::Max(count(entry, &entry_path)?)),
            "rangeLength" => Constraint::Length(count_range(entry, &entry_path)?),
            "rowsMin" => Constraint::Rows(Bound::Min(count(entry, &entry_path)?)),
            "rowsMax" => Constraint::Rows(Bound::Max(count(entry, &entry_path)?)),
            "rowsRange" => Constraint::Rows(count_range(entry, &entry_path)?),
            "colsMin" => Constraint::Columns(Bound::Min(count(entry, &entry_path)?)),
            "colsMax" => Constraint::Columns(Bound::Max(count(entry, &entry_path)?)),
            "colsRange" => Constraint::Columns(count_range(entry, &entry_path)?),
            _ => return Err(ManifestError::invalid(entry_path, "unknown constraint")),
        };
        spec.constraints.push(constraint);
    }
    Ok(spec)
}

fn directive(json: &Json, path: &str) -> Result<Directive, ManifestError> {
    match json.as_str() {
        Some("noCheck") => Ok(Directive::NoCheck),
        Some("allowNone") => Ok(Directive::AllowNone),
        _ => Err(ManifestError::invalid(
            path,
            "unknown command (expected `noCheck` or `allowNone`)",
        )),
    }
}

fn number(json: &Json, path: &str) -> Result<Number, ManifestError> {
    let Json::Number(n) = json else {
        return Err(ManifestError::invalid(path, "must be a number"));
    };
    Ok(match n.as_i64() {
        Some(i) => Number::Int(i),
        None => Number::Float(n.as_f64().unwrap_or(f64::NAN)),
    })
}

fn pair<'a>(json: &'a Json, path: &str) -> Result<(&'a Json, &'a Json), ManifestError> {
    match json.as_array().map(Vec::as_slice) {
        Some([low, high]) => Ok((low, high)),
        _ => Err(ManifestError::invalid(path, "must be a [low, high] pair")),
    }
}

fn number_pair(json: &Json, path: &str) -> Result<(Number, Number), ManifestError> {
    let (low, high) = pair(json, path)?;
    Ok((
        number(low, &format!("{path}[0]"))?,
        number(high, &format!("{path}[1]"))?,
    ))
}

fn count(json: &Json, path: &str) -> Result<usize, ManifestError> {
    json.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ManifestError::invalid(path, "must be a non-negative integer"))
}

fn count_range(json: &Json, path: &str) -> Result<Bound<usize>, ManifestError> {
    let (low, high) = pair(json, path)?;
    Ok(Bound::Range(
        count(low, &format!("{path}[0]"))?,
        count(high, &format!("{path}[1]"))?,
    ))
}

fn members(json: &Json, path: &str) -> Result<Vec<argcheck_kernel::Value>, ManifestError> {
    let Json::Array(items) = json else {
        return Err(ManifestError::invalid(path, "must be a list of members"));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| value_from_json(item, &format!("{path}[{i}]")))
        .collect()
}
