//! Value Evaluator: applies one position's [`ValueSpec`] to an argument.
//!
//! The evaluator is chosen by the runtime category of the argument at this
//! call, not by any declared type, so a position that sometimes receives a
//! number and sometimes a string is checked correctly either way.
//!
//! ## Array folding
//!
//! A two-dimensional array with an axis of extent 1, shape `(1, N)` or
//! `(N, 1)`, is folded **in place** into the canonical column `(N, 1)`
//! before it is measured. The caller observes the folded array afterwards;
//! the guards hand it on to the wrapped operation. Exclusive access
//! (`&mut Value`) is what keeps the reshape free of data races.

use crate::constraint::{Bound, Constraint, Directive, ValueSpec};
use crate::error::CheckError;
use crate::ordinal::ordinal;
use crate::value::{Category, Number, Value, format_values};
use ndarray::{ArrayD, IxDyn};
use std::fmt::Display;
use tracing::debug;

/// What a bound measured, as it reads in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Value,
    Length,
    Rows,
    Columns,
}

impl Measure {
    fn label(self) -> &'static str {
        match self {
            Measure::Value => "value",
            Measure::Length => "length",
            Measure::Rows => "number of rows",
            Measure::Columns => "number of columns",
        }
    }
}

/// Where a check is happening, for error messages.
struct Site<'a> {
    position: usize,
    function: &'a str,
}

impl Site<'_> {
    fn ordinal(&self) -> String {
        ordinal(self.position + 1)
    }

    fn fail(&self, message: String) -> CheckError {
        CheckError::ValueConstraint {
            position: self.position,
            function: self.function.to_string(),
            message,
        }
    }

    fn check_bound<T: PartialOrd + Display>(
        &self,
        measured: T,
        bound: &Bound<T>,
        measure: Measure,
    ) -> Result<(), CheckError> {
        let (ord, function, what) = (self.ordinal(), self.function, measure.label());
        match bound {
            Bound::Range(low, high) if measured < *low || measured > *high => Err(self.fail(
                format!(
                    "The {ord} argument of the function {function}() has {what} out of the accepted range: [{low}, {high}]."
                ),
            )),
            Bound::Min(min) if measured < *min => Err(self.fail(format!(
                "The {ord} argument of the function {function}() has lower {what} than the accepted: {min}."
            ))),
            Bound::Max(max) if measured > *max => Err(self.fail(format!(
                "The {ord} argument of the function {function}() has higher {what} than the accepted: {max}."
            ))),
            _ => Ok(()),
        }
    }

    fn check_membership(&self, value: &Value, members: &[Value]) -> Result<(), CheckError> {
        if members.iter().any(|member| member.matches(value)) {
            return Ok(());
        }
        Err(self.fail(format!(
            "The {} argument of the function {}() does not belong to the set {}.",
            self.ordinal(),
            self.function,
            format_values(members)
        )))
    }
}

/// Check one argument against its Value Specification.
///
/// `position` is zero-based. May fold a `(1, N)` / `(N, 1)` array argument
/// in place (see the module docs).
pub fn evaluate(
    position: usize,
    value: &mut Value,
    spec: &ValueSpec,
    function: &str,
) -> Result<(), CheckError> {
    let site = Site { position, function };

    let category = value.category();
    if category == Category::Boolean {
        return Ok(());
    }

    match spec.directive {
        Some(Directive::NoCheck) => return Ok(()),
        Some(Directive::AllowNone) if value.is_none() => return Ok(()),
        _ => {}
    }
    if value.is_none() {
        return Err(site.fail(format!(
            "The {} argument of the function {function}() must not be absent.",
            site.ordinal()
        )));
    }

    if let Some(number) = value.as_number() {
        return evaluate_number(&site, number, value, spec);
    }
    match value {
        Value::Text(text) => evaluate_text(&site, text, spec),
        Value::List(items) | Value::Tuple(items) => evaluate_collection(&site, items.len(), spec),
        Value::Dict(entries) => evaluate_collection(&site, entries.len(), spec),
        Value::Array(array) => evaluate_array(&site, array, spec),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) | Value::None => Ok(()),
    }
}

fn evaluate_number(
    site: &Site<'_>,
    number: Number,
    value: &Value,
    spec: &ValueSpec,
) -> Result<(), CheckError> {
    for constraint in &spec.constraints {
        match constraint {
            Constraint::Value(bound) => site.check_bound(number, bound, Measure::Value)?,
            Constraint::Set(members) => site.check_membership(value, members)?,
            _ => {}
        }
    }
    Ok(())
}

fn evaluate_text(site: &Site<'_>, text: &str, spec: &ValueSpec) -> Result<(), CheckError> {
    let length = text.chars().count();
    for constraint in &spec.constraints {
        match constraint {
            Constraint::Length(bound) => site.check_bound(length, bound, Measure::Length)?,
            Constraint::Set(members) => {
                site.check_membership(&Value::Text(text.to_string()), members)?
            }
            _ => {}
        }
    }
    Ok(())
}

fn evaluate_collection(site: &Site<'_>, length: usize, spec: &ValueSpec) -> Result<(), CheckError> {
    for constraint in &spec.constraints {
        if let Constraint::Length(bound) = constraint {
            site.check_bound(length, bound, Measure::Length)?;
        }
    }
    Ok(())
}

fn evaluate_array(
    site: &Site<'_>,
    array: &mut ArrayD<f64>,
    spec: &ValueSpec,
) -> Result<(), CheckError> {
    if array.ndim() > 2 {
        return Err(site.fail(format!(
            "The {} variable of function {}() has more than 2 dimensions. Currently only 1D and 2D arrays are supported. If a higher dimensional array is intended, deactivate the value check for this input with the `noCheck` command.",
            site.ordinal(),
            site.function
        )));
    }

    // Logical dimensionality: a folded column counts as one-dimensional.
    let mut dims = array.ndim();
    if dims == 2 && array.shape().contains(&1) {
        fold_to_column(array);
        debug!(
            function = site.function,
            position = site.position,
            rows = array.shape()[0],
            "folded single-axis array into a column"
        );
        dims = 1;
    }

    for constraint in &spec.constraints {
        match constraint {
            Constraint::Length(bound) if dims == 1 => {
                site.check_bound(array.shape()[0], bound, Measure::Length)?
            }
            Constraint::Rows(bound) if array.ndim() >= 1 => {
                site.check_bound(array.shape()[0], bound, Measure::Rows)?
            }
            Constraint::Columns(bound) if array.ndim() == 2 => {
                site.check_bound(array.shape()[1], bound, Measure::Columns)?
            }
            _ => {}
        }
    }
    Ok(())
}

/// Reshape a `(1, N)` or `(N, 1)` array into `(N, 1)`, keeping element order.
fn fold_to_column(array: &mut ArrayD<f64>) {
    let len = array.len();
    let data: Vec<f64> = array.iter().copied().collect();
    if let Ok(column) = ArrayD::from_shape_vec(IxDyn(&[len, 1]), data) {
        *array = column;
    }
}
