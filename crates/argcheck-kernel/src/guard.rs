//! The two guards: [`accepted_types`] and [`accepted_values`].
//!
//! A guard wraps an [`Operation`] and, on every call:
//!
//! 1. delegates untouched when the call carries `removeChecks=True`;
//! 2. binds the call against the operation's [`Signature`];
//! 3. checks each bound argument in declared order, stopping at the first
//!    failure;
//! 4. delegates the bound arguments to the inner operation.
//!
//! The inner operation never runs when a check fails. Guards are
//! operations themselves, so they stack:
//!
//! ```
//! use argcheck_kernel::{
//!     Call, Function, Kind, Operation, Signature, TypeGuardOptions, TypeSpec, ValueGuardOptions,
//!     ValueSpec, accepted_types, accepted_values,
//! };
//!
//! let sig = Signature::new("scale").param("x").param("factor");
//! let scale = Function::new(sig, |args| args.len());
//! let checked = accepted_types(
//!     accepted_values(
//!         scale,
//!         vec![ValueSpec::new().range(1, 10), ValueSpec::new().min_value(5)],
//!         ValueGuardOptions::default(),
//!     ),
//!     vec![TypeSpec::any_of([Kind::Int, Kind::Float]); 2],
//!     TypeGuardOptions::default(),
//! );
//!
//! assert_eq!(checked.invoke(Call::with_args([5, 10])).unwrap(), 2);
//! assert!(checked.invoke(Call::with_args([0, 10])).is_err());
//! ```

use crate::binder::{Arguments, Call, Signature, bind, bind_lenient};
use crate::classify::{Consistency, TypeSpec, check_type};
use crate::constraint::ValueSpec;
use crate::error::CheckError;
use crate::evaluate::evaluate;
use tracing::{debug, trace, warn};

/// Something a guard can wrap.
pub trait Operation {
    type Output;

    /// Identity metadata (name, documentation, parameters).
    fn signature(&self) -> &Signature;

    fn invoke(&self, call: Call) -> Result<Self::Output, CheckError>;
}

impl<O: Operation + ?Sized> Operation for Box<O> {
    type Output = O::Output;

    fn signature(&self) -> &Signature {
        (**self).signature()
    }

    fn invoke(&self, call: Call) -> Result<Self::Output, CheckError> {
        (**self).invoke(call)
    }
}

/// A closure registered together with its signature.
pub struct Function<F> {
    signature: Signature,
    body: F,
}

impl<F> Function<F> {
    pub fn new<R>(signature: Signature, body: F) -> Self
    where
        F: Fn(Arguments) -> R,
    {
        Self { signature, body }
    }
}

impl<F, R> Operation for Function<F>
where
    F: Fn(Arguments) -> R,
{
    type Output = R;

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, call: Call) -> Result<R, CheckError> {
        let args = bind_lenient(&self.signature, call)?;
        Ok((self.body)(args))
    }
}

/// Registration-time switches for [`accepted_types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeGuardOptions {
    /// When false the guard performs no work at all.
    pub types_check_enabled: bool,
    /// Element-kind homogeneity for list/tuple arguments whose
    /// specification carries no directive of its own.
    pub object_consistency_check: bool,
}

impl Default for TypeGuardOptions {
    fn default() -> Self {
        Self {
            types_check_enabled: true,
            object_consistency_check: true,
        }
    }
}

/// Registration-time switches for [`accepted_values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueGuardOptions {
    /// When false the guard performs no work at all.
    pub value_check_enabled: bool,
}

impl Default for ValueGuardOptions {
    fn default() -> Self {
        Self {
            value_check_enabled: true,
        }
    }
}

/// Operation wrapped by [`accepted_types`].
pub struct TypeGuard<O> {
    inner: O,
    /// `None` when the guard was registered disabled.
    specs: Option<Vec<TypeSpec>>,
    default_consistency: Consistency,
}

/// Operation wrapped by [`accepted_values`].
pub struct ValueGuard<O> {
    inner: O,
    /// `None` when the guard was registered disabled.
    specs: Option<Vec<ValueSpec>>,
}

/// Wrap `inner` with per-position Type Specifications.
pub fn accepted_types<O: Operation>(
    inner: O,
    specs: Vec<TypeSpec>,
    options: TypeGuardOptions,
) -> TypeGuard<O> {
    let name = &inner.signature().name;
    if !options.types_check_enabled {
        debug!(function = %name, "type checks disabled at registration");
        return TypeGuard {
            inner,
            specs: None,
            default_consistency: Consistency::disabled(),
        };
    }
    warn_on_spec_count(name, specs.len(), inner.signature().params.len(), "type");

    let default_consistency = if options.object_consistency_check {
        Consistency::enabled()
    } else {
        Consistency::disabled()
    };
    TypeGuard {
        inner,
        specs: Some(specs),
        default_consistency,
    }
}

/// Wrap `inner` with per-position Value Specifications.
pub fn accepted_values<O: Operation>(
    inner: O,
    specs: Vec<ValueSpec>,
    options: ValueGuardOptions,
) -> ValueGuard<O> {
    let name = &inner.signature().name;
    if !options.value_check_enabled {
        debug!(function = %name, "value checks disabled at registration");
        return ValueGuard { inner, specs: None };
    }
    warn_on_spec_count(name, specs.len(), inner.signature().params.len(), "value");

    ValueGuard {
        inner,
        specs: Some(specs),
    }
}

fn warn_on_spec_count(function: &str, specs: usize, params: usize, what: &str) {
    if specs != params {
        warn!(
            function,
            specs, params, "{what} specification count differs from parameter count"
        );
    }
}

impl<O> TypeGuard<O> {
    pub fn is_enabled(&self) -> bool {
        self.specs.is_some()
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O> ValueGuard<O> {
    pub fn is_enabled(&self) -> bool {
        self.specs.is_some()
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Operation> Operation for TypeGuard<O> {
    type Output = O::Output;

    fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    fn invoke(&self, call: Call) -> Result<O::Output, CheckError> {
        let Some(specs) = &self.specs else {
            return self.inner.invoke(call);
        };
        let signature = self.inner.signature();
        if call.bypasses_checks() {
            debug!(function = %signature.name, "type checks removed for this call");
            return self.inner.invoke(call);
        }

        let args = bind(signature, call, specs.len())?;
        for entry in args.iter() {
            trace!(function = %signature.name, position = entry.position, kind = %entry.value.kind(), "checking type");
            check_type(
                entry.position,
                &entry.value,
                &specs[entry.position],
                &signature.name,
                &self.default_consistency,
            )?;
        }
        self.inner.invoke(args.into_call())
    }
}

impl<O: Operation> Operation for ValueGuard<O> {
    type Output = O::Output;

    fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    fn invoke(&self, call: Call) -> Result<O::Output, CheckError> {
        let Some(specs) = &self.specs else {
            return self.inner.invoke(call);
        };
        let signature = self.inner.signature();
        if call.bypasses_checks() {
            debug!(function = %signature.name, "value checks removed for this call");
            return self.inner.invoke(call);
        }

        let mut args = bind(signature, call, specs.len())?;
        for entry in args.iter_mut() {
            trace!(function = %signature.name, position = entry.position, "checking value");
            evaluate(
                entry.position,
                &mut entry.value,
                &specs[entry.position],
                &signature.name,
            )?;
        }
        self.inner.invoke(args.into_call())
    }
}
