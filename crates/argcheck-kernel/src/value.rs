//! Runtime values seen by the guards.
//!
//! A call argument is one of a closed set of tagged variants. Two
//! projections drive every check:
//!
//! - [`Kind`]: the exact runtime type tag (what a Type Specification names);
//! - [`Category`]: the coarser class that selects a value evaluator.
//!
//! Both are pure functions of the value.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(BTreeMap<String, Value>),
    /// Numeric array of any dimensionality. Only 1-D and 2-D arrays can be
    /// value-checked.
    Array(ArrayD<f64>),
    /// The absent value.
    None,
}

/// Exact runtime type tag of a [`Value`].
///
/// `Bool` is its own kind: a boolean never satisfies an `Int` rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Int,
    Float,
    Bool,
    Str,
    List,
    Tuple,
    Dict,
    #[serde(rename = "ndarray")]
    NdArray,
    #[serde(rename = "None")]
    None,
}

/// Evaluator-selecting class of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Number,
    Text,
    Boolean,
    Collection,
    ArrayLike,
    Absent,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Int,
        Kind::Float,
        Kind::Bool,
        Kind::Str,
        Kind::List,
        Kind::Tuple,
        Kind::Dict,
        Kind::NdArray,
        Kind::None,
    ];

    pub fn category(self) -> Category {
        match self {
            Kind::Int | Kind::Float => Category::Number,
            Kind::Str => Category::Text,
            Kind::Bool => Category::Boolean,
            Kind::List | Kind::Tuple | Kind::Dict => Category::Collection,
            Kind::NdArray => Category::ArrayLike,
            Kind::None => Category::Absent,
        }
    }

    /// The name used in messages and manifests.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Str => "str",
            Kind::List => "list",
            Kind::Tuple => "tuple",
            Kind::Dict => "dict",
            Kind::NdArray => "ndarray",
            Kind::None => "None",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Kind::Int),
            "float" => Ok(Kind::Float),
            "bool" => Ok(Kind::Bool),
            "str" => Ok(Kind::Str),
            "list" => Ok(Kind::List),
            "tuple" => Ok(Kind::Tuple),
            "dict" => Ok(Kind::Dict),
            "ndarray" => Ok(Kind::NdArray),
            "None" | "none" => Ok(Kind::None),
            _ => Err(format!("unknown kind: {s}")),
        }
    }
}

/// Render a kind list the way messages show it: `[int, float]`.
pub fn format_kinds(kinds: &[Kind]) -> String {
    let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
    format!("[{}]", names.join(", "))
}

/// Render a value list the way messages show it: `['a', 'b']`.
pub fn format_values(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Text(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Tuple(_) => Kind::Tuple,
            Value::Dict(_) => Kind::Dict,
            Value::Array(_) => Kind::NdArray,
            Value::None => Kind::None,
        }
    }

    pub fn category(&self) -> Category {
        self.kind().category()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(x) => Some(Number::Float(*x)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Elements of a list or tuple.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Membership equality used by set constraints.
    ///
    /// Numbers compare across `int`/`float`; everything else compares
    /// structurally. A boolean never equals a number.
    pub fn matches(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", Number::Float(*x)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::List(items) => write!(f, "{}", format_values(items)),
            Value::Tuple(items) => {
                let rendered: Vec<String> = items.iter().map(Value::to_string).collect();
                if rendered.len() == 1 {
                    write!(f, "({},)", rendered[0])
                } else {
                    write!(f, "({})", rendered.join(", "))
                }
            }
            Value::Dict(entries) => {
                let rendered: Vec<String> =
                    entries.iter().map(|(k, v)| format!("'{k}': {v}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            Value::Array(a) => {
                let dims: Vec<String> = a.shape().iter().map(usize::to_string).collect();
                write!(f, "ndarray(shape=[{}])", dims.join(", "))
            }
            Value::None => f.write_str("None"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(v: ArrayD<f64>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// A numeric scalar or bound.
///
/// Integer pairs compare exactly; any pairing involving a float compares
/// as `f64`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(i64::from(v))
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        match v {
            Number::Int(i) => Value::Int(i),
            Number::Float(x) => Value::Float(x),
        }
    }
}
