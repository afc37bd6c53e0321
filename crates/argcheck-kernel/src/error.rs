//! Error types for argument checks.

use serde::{Deserialize, Serialize};

/// Errors raised by a guard before the wrapped operation runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The bound argument count does not match the declared specifications.
    #[error("invalid number of arguments for {function}(): {declared} declared, {supplied} bound")]
    ArgumentCount {
        function: String,
        declared: usize,
        supplied: usize,
    },

    /// A keyword argument names no declared parameter.
    #[error("{function}() got an unexpected argument `{name}`")]
    UnknownArgument { function: String, name: String },

    /// A parameter received both a positional and a keyword value.
    #[error("{function}() got multiple values for argument `{name}`")]
    DuplicateArgument { function: String, name: String },

    /// A required parameter received no value and has no default.
    #[error("{function}() is missing required argument `{name}`")]
    MissingArgument { function: String, name: String },

    /// The runtime kind of an argument (or of its elements) is not accepted.
    #[error("{message}")]
    TypeKind {
        position: usize,
        function: String,
        message: String,
    },

    /// The value, length or shape of an argument violates its constraints.
    #[error("{message}")]
    ValueConstraint {
        position: usize,
        function: String,
        message: String,
    },
}

/// The three error families callers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Mismatch between the declared specifications and the call.
    Configuration,
    TypeKind,
    ValueConstraint,
}

impl CheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentCount { .. }
            | Self::UnknownArgument { .. }
            | Self::DuplicateArgument { .. }
            | Self::MissingArgument { .. } => ErrorKind::Configuration,
            Self::TypeKind { .. } => ErrorKind::TypeKind,
            Self::ValueConstraint { .. } => ErrorKind::ValueConstraint,
        }
    }

    /// Zero-based position of the offending argument, when one exists.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::TypeKind { position, .. } | Self::ValueConstraint { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    pub fn function(&self) -> &str {
        match self {
            Self::ArgumentCount { function, .. }
            | Self::UnknownArgument { function, .. }
            | Self::DuplicateArgument { function, .. }
            | Self::MissingArgument { function, .. }
            | Self::TypeKind { function, .. }
            | Self::ValueConstraint { function, .. } => function,
        }
    }

    pub fn violation(&self) -> Violation {
        Violation {
            kind: self.kind(),
            position: self.position(),
            function: self.function().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serialisable projection of a [`CheckError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub function: String,
    pub message: String,
}
