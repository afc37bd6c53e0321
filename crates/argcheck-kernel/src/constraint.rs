//! Value Specifications: the constraints declared for one argument position.
//!
//! A [`ValueSpec`] is an optional [`Directive`] plus an ordered list of
//! [`Constraint`]s. Which constraints apply is decided per call by the
//! runtime category of the argument:
//!
//! | category    | constraints                                   |
//! |-------------|-----------------------------------------------|
//! | number      | `Value`, `Set`                                |
//! | text        | `Length` (characters), `Set`                  |
//! | collection  | `Length` (elements)                           |
//! | array-like  | `Length` (1-D only), `Rows`, `Columns`        |
//!
//! Constraints that do not apply to the argument's category are skipped.

use crate::value::{Number, Value};

/// A lower bound, an upper bound, or both. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound<T> {
    Min(T),
    Max(T),
    Range(T, T),
}

/// Position-wide switches that short-circuit the constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Skip every check for this position, including the absent check.
    NoCheck,
    /// Skip every check when the argument is absent.
    AllowNone,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Numeric value bounds.
    Value(Bound<Number>),
    /// Membership of the whole value (numbers and strings).
    Set(Vec<Value>),
    /// Character count, element count, or 1-D array length.
    Length(Bound<usize>),
    /// Extent of axis 0 of an array.
    Rows(Bound<usize>),
    /// Extent of axis 1 of a two-axis array.
    Columns(Bound<usize>),
}

/// Declared Value Specification for one argument position.
///
/// ```
/// use argcheck_kernel::ValueSpec;
///
/// let spec = ValueSpec::new().range(1, 10).allow_none();
/// assert_eq!(spec.constraints.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSpec {
    pub directive: Option<Directive>,
    pub constraints: Vec<Constraint>,
}

impl ValueSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec whose position is never checked.
    pub fn unchecked() -> Self {
        Self::new().no_check()
    }

    pub fn no_check(mut self) -> Self {
        self.directive = Some(Directive::NoCheck);
        self
    }

    pub fn allow_none(mut self) -> Self {
        self.directive = Some(Directive::AllowNone);
        self
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn range(self, low: impl Into<Number>, high: impl Into<Number>) -> Self {
        self.with(Constraint::Value(Bound::Range(low.into(), high.into())))
    }

    pub fn min_value(self, min: impl Into<Number>) -> Self {
        self.with(Constraint::Value(Bound::Min(min.into())))
    }

    pub fn max_value(self, max: impl Into<Number>) -> Self {
        self.with(Constraint::Value(Bound::Max(max.into())))
    }

    pub fn one_of<V: Into<Value>>(self, members: impl IntoIterator<Item = V>) -> Self {
        self.with(Constraint::Set(members.into_iter().map(Into::into).collect()))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.with(Constraint::Length(Bound::Min(min)))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.with(Constraint::Length(Bound::Max(max)))
    }

    pub fn range_length(self, low: usize, high: usize) -> Self {
        self.with(Constraint::Length(Bound::Range(low, high)))
    }

    pub fn rows_min(self, min: usize) -> Self {
        self.with(Constraint::Rows(Bound::Min(min)))
    }

    pub fn rows_max(self, max: usize) -> Self {
        self.with(Constraint::Rows(Bound::Max(max)))
    }

    pub fn rows_range(self, low: usize, high: usize) -> Self {
        self.with(Constraint::Rows(Bound::Range(low, high)))
    }

    pub fn cols_min(self, min: usize) -> Self {
        self.with(Constraint::Columns(Bound::Min(min)))
    }

    pub fn cols_max(self, max: usize) -> Self {
        self.with(Constraint::Columns(Bound::Max(max)))
    }

    pub fn cols_range(self, low: usize, high: usize) -> Self {
        self.with(Constraint::Columns(Bound::Range(low, high)))
    }
}
