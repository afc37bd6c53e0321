//! # argcheck kernel
//!
//! Declarative runtime checks for the arguments of an operation: a *type*
//! guard that checks the runtime kind of every argument, and a *value*
//! guard that checks its range, length, membership or shape.
//!
//! ## Architecture
//!
//! ```text
//! Value / Kind / Category   ← tagged runtime values and their classification
//!     │
//! TypeSpec → check_type     ← Type Classifier (kind rule + element consistency)
//! ValueSpec → evaluate      ← Value Evaluator (number, text, collection, array)
//!     │
//! Signature + Call → bind   ← Argument Binder (positional, keyword, defaults)
//!     │
//! accepted_types            ← guards wrapping an Operation
//! accepted_values
//! ```
//!
//! Every check runs before the wrapped operation; the first failing
//! position aborts the call with a [`CheckError`].

pub mod binder;
pub mod classify;
pub mod constraint;
pub mod error;
pub mod evaluate;
pub mod guard;
pub mod ordinal;
pub mod value;

pub use binder::{
    ArgumentSource, Arguments, BoundArgument, Call, Param, REMOVE_CHECKS, Signature, bind,
    bind_lenient,
};
pub use classify::{Consistency, TypeRule, TypeSpec, check_type};
pub use constraint::{Bound, Constraint, Directive, ValueSpec};
pub use error::{CheckError, ErrorKind, Violation};
pub use evaluate::evaluate;
pub use guard::{
    Function, Operation, TypeGuard, TypeGuardOptions, ValueGuard, ValueGuardOptions,
    accepted_types, accepted_values,
};
pub use ordinal::ordinal;
pub use value::{Category, Kind, Number, Value};
