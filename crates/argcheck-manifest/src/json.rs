//! JSON encoding of runtime values.
//!
//! JSON has no tuples or n-dimensional arrays, so both travel as
//! single-key objects: `{"$tuple": [...]}` and `{"$ndarray": [[...], ...]}`.
//! Every other object is a dict.

use crate::error::ManifestError;
use argcheck_kernel::Value;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use serde_json::{Map, Number, Value as Json};

pub const TUPLE_TAG: &str = "$tuple";
pub const NDARRAY_TAG: &str = "$ndarray";

pub fn value_from_json(json: &Json, path: &str) -> Result<Value, ManifestError> {
    match json {
        Json::Null => Ok(Value::None),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(number_from_json(n)),
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| value_from_json(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Json::Object(map) => object_from_json(map, path),
    }
}

fn number_from_json(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn object_from_json(map: &Map<String, Json>, path: &str) -> Result<Value, ManifestError> {
    if map.len() == 1 {
        if let Some(items) = map.get(TUPLE_TAG) {
            let tag_path = format!("{path}.{TUPLE_TAG}");
            let Json::Array(items) = items else {
                return Err(ManifestError::invalid(tag_path, "must be an array"));
            };
            return items
                .iter()
                .enumerate()
                .map(|(i, item)| value_from_json(item, &format!("{tag_path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple);
        }
        if let Some(nested) = map.get(NDARRAY_TAG) {
            return array_from_json(nested, &format!("{path}.{NDARRAY_TAG}")).map(Value::Array);
        }
    }
    let mut entries = Vec::with_capacity(map.len());
    for (key, item) in map {
        entries.push((key.clone(), value_from_json(item, &format!("{path}.{key}"))?));
    }
    Ok(Value::dict(entries))
}

/// Parse nested numeric lists into an array; every level must be rectangular.
fn array_from_json(nested: &Json, path: &str) -> Result<ArrayD<f64>, ManifestError> {
    let mut shape = Vec::new();
    let mut probe = nested;
    while let Json::Array(items) = probe {
        shape.push(items.len());
        match items.first() {
            Some(first) => probe = first,
            None => break,
        }
    }

    let mut data = Vec::new();
    collect_elements(nested, &shape, path, &mut data)?;
    ArrayD::from_shape_vec(IxDyn(&shape), data)
        .map_err(|e| ManifestError::invalid(path, format!("not a rectangular array: {e}")))
}

fn collect_elements(
    json: &Json,
    shape: &[usize],
    path: &str,
    out: &mut Vec<f64>,
) -> Result<(), ManifestError> {
    match (json, shape.split_first()) {
        (Json::Number(n), None) => {
            out.push(n.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        (Json::Array(items), Some((&extent, rest))) if items.len() == extent => {
            for (i, item) in items.iter().enumerate() {
                collect_elements(item, rest, &format!("{path}[{i}]"), out)?;
            }
            Ok(())
        }
        (Json::Array(_), Some((&extent, _))) => Err(ManifestError::invalid(
            path,
            format!("ragged array: expected {extent} elements"),
        )),
        _ => Err(ManifestError::invalid(
            path,
            "array elements must be numbers nested to a uniform depth",
        )),
    }
}

pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => float_json(*f),
        Value::Bool(b) => Json::Bool(*b),
        Value::Text(s) => Json::String(s.clone()),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Tuple(items) => tagged(
            TUPLE_TAG,
            Json::Array(items.iter().map(value_to_json).collect()),
        ),
        Value::Dict(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Array(array) => tagged(NDARRAY_TAG, nested_json(array.view())),
        Value::None => Json::Null,
    }
}

fn tagged(tag: &str, payload: Json) -> Json {
    let mut map = Map::new();
    map.insert(tag.to_string(), payload);
    Json::Object(map)
}

fn float_json(f: f64) -> Json {
    Number::from_f64(f).map_or(Json::Null, Json::Number)
}

fn nested_json(view: ArrayViewD<'_, f64>) -> Json {
    if view.ndim() == 0 {
        return view.iter().next().copied().map_or(Json::Null, float_json);
    }
    Json::Array(
        view.axis_iter(Axis(0))
            .map(|sub| nested_json(sub.into_dyn()))
            .collect(),
    )
}
