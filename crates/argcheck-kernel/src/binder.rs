//! Argument Binder: reconciles a declared [`Signature`] with an actual
//! [`Call`].
//!
//! Positional arguments take parameter positions `0..`; keyword arguments
//! are resolved to their declared position by name. The resulting
//! [`Arguments`] table is ordered by declared position, so every check is
//! applied the same way whether an argument was passed positionally or by
//! name.

use crate::error::CheckError;
use crate::value::Value;

/// Reserved keyword that disables every check for one call.
pub const REMOVE_CHECKS: &str = "removeChecks";

/// A declared formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Identity metadata of an operation: its name, documentation and
/// parameters in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param::required(name));
        self
    }

    pub fn param_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param::optional(name, default));
        self
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }
}

/// The arguments supplied at one call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args<V: Into<Value>>(args: impl IntoIterator<Item = V>) -> Self {
        Self {
            positional: args.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a keyword argument, replacing an earlier one of the same name.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keywords.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.keywords.push((name, value)),
        }
        self
    }

    /// Mark this call as unchecked (`removeChecks=True`).
    pub fn remove_checks(self) -> Self {
        self.kwarg(REMOVE_CHECKS, true)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    /// True when the reserved `removeChecks` keyword is present and `true`.
    pub fn bypasses_checks(&self) -> bool {
        self.keywords
            .iter()
            .any(|(name, value)| name == REMOVE_CHECKS && *value == Value::Bool(true))
    }
}

/// How a bound argument got its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentSource {
    Positional,
    Keyword,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    /// Zero-based declared position.
    pub position: usize,
    pub name: String,
    pub value: Value,
    pub source: ArgumentSource,
}

/// Bound Argument Table for one call, ordered by declared position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<BoundArgument>,
}

impl Arguments {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    pub fn at(&self, position: usize) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.position == position)
            .map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundArgument> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BoundArgument> {
        self.entries.iter_mut()
    }

    pub fn into_entries(self) -> Vec<BoundArgument> {
        self.entries
    }

    /// Re-express the table as a call: the leading run of contiguous
    /// positions is passed positionally, everything after it by name.
    pub fn into_call(self) -> Call {
        let mut call = Call::new();
        let mut contiguous = true;
        for (index, entry) in self.entries.into_iter().enumerate() {
            contiguous &= entry.position == index;
            call = if contiguous {
                call.arg(entry.value)
            } else {
                call.kwarg(entry.name, entry.value)
            };
        }
        call
    }

    fn insert(&mut self, entry: BoundArgument) {
        let at = self
            .entries
            .partition_point(|existing| existing.position < entry.position);
        self.entries.insert(at, entry);
    }

    fn contains(&self, position: usize) -> bool {
        self.entries.iter().any(|e| e.position == position)
    }

    fn backfill_defaults(&mut self, signature: &Signature) {
        for (position, param) in signature.params.iter().enumerate() {
            if let Some(default) = &param.default
                && !self.contains(position)
            {
                self.insert(BoundArgument {
                    position,
                    name: param.name.clone(),
                    value: default.clone(),
                    source: ArgumentSource::Default,
                });
            }
        }
    }
}

/// Bind what the call supplied, without consulting defaults.
fn bind_supplied(signature: &Signature, call: Call) -> Result<Arguments, CheckError> {
    let function = &signature.name;
    let mut table = Arguments::default();
    let supplied = call.positional.len()
        + call
            .keywords
            .iter()
            .filter(|(name, _)| name != REMOVE_CHECKS)
            .count();

    for (position, value) in call.positional.into_iter().enumerate() {
        let Some(param) = signature.params.get(position) else {
            return Err(CheckError::ArgumentCount {
                function: function.clone(),
                declared: signature.params.len(),
                supplied,
            });
        };
        table.insert(BoundArgument {
            position,
            name: param.name.clone(),
            value,
            source: ArgumentSource::Positional,
        });
    }

    for (name, value) in call.keywords {
        if name == REMOVE_CHECKS {
            continue;
        }
        let Some(position) = signature.position_of(&name) else {
            return Err(CheckError::UnknownArgument {
                function: function.clone(),
                name,
            });
        };
        if table.contains(position) {
            return Err(CheckError::DuplicateArgument {
                function: function.clone(),
                name,
            });
        }
        table.insert(BoundArgument {
            position,
            name,
            value,
            source: ArgumentSource::Keyword,
        });
    }

    Ok(table)
}

/// Strict binding against `declared` specifications.
///
/// Defaults are consulted only when the supplied count differs from
/// `declared`; after back-filling, the table must hold exactly `declared`
/// entries, each at a position that has a specification.
pub fn bind(signature: &Signature, call: Call, declared: usize) -> Result<Arguments, CheckError> {
    let mut table = bind_supplied(signature, call)?;
    if table.len() != declared {
        table.backfill_defaults(signature);
    }

    let out_of_range = table.iter().any(|e| e.position >= declared);
    if table.len() != declared || out_of_range {
        return Err(CheckError::ArgumentCount {
            function: signature.name.clone(),
            declared,
            supplied: table.len(),
        });
    }
    Ok(table)
}

/// Plain-function binding: every missing parameter takes its default, and a
/// required parameter without a value is an error.
pub fn bind_lenient(signature: &Signature, call: Call) -> Result<Arguments, CheckError> {
    let mut table = bind_supplied(signature, call)?;
    table.backfill_defaults(signature);

    if let Some(missing) = signature
        .params
        .iter()
        .enumerate()
        .find(|(position, _)| !table.contains(*position))
    {
        return Err(CheckError::MissingArgument {
            function: signature.name.clone(),
            name: missing.1.name.clone(),
        });
    }
    Ok(table)
}
