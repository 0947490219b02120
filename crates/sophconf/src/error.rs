//! Error types for sophconf

use std::fmt;

use crate::option::OptionType;
use crate::value::ValueKind;

/// Result type for sophconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which namespace of a node a failed lookup probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Options first, then sections (plain `get`).
    Any,
    /// Options only.
    Option,
    /// Sections only.
    Section,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Any => write!(f, "option or section"),
            Lookup::Option => write!(f, "option"),
            Lookup::Section => write!(f, "section"),
        }
    }
}

/// Errors that can occur when reading or mutating a [`Config`](crate::Config) tree.
///
/// No operation that returns one of these has mutated the tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The name is neither an option nor a section of the node
    #[error("No {lookup} named {name} in this Config object")]
    NotFound { name: String, lookup: Lookup },

    /// A typed node refused a value whose kind differs from the stored one
    #[error("Value for {name} must be {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// A protected node refused to create a new option
    #[error("This section is protected and you cannot create new option {name}")]
    CreationForbidden { name: String },

    /// Plain assignment targeted an existing section
    #[error("Cannot assign to section {name} of a Config object")]
    SectionImmutable { name: String },

    /// A typed option could not cast its stored value on read
    #[error("Cannot read option {name} ({from}) as {to}: {reason}")]
    Coercion {
        name: String,
        from: ValueKind,
        to: OptionType,
        reason: String,
    },
}

impl Error {
    pub(crate) fn not_found(name: impl Into<String>, lookup: Lookup) -> Self {
        Self::NotFound {
            name: name.into(),
            lookup,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NOT_FOUND",
            Error::TypeMismatch { .. } => "TYPE_MISMATCH",
            Error::CreationForbidden { .. } => "CREATION_FORBIDDEN",
            Error::SectionImmutable { .. } => "SECTION_IMMUTABLE",
            Error::Coercion { .. } => "COERCION_FAILED",
        }
    }

    /// The option or section name the error refers to.
    pub fn name(&self) -> &str {
        match self {
            Error::NotFound { name, .. }
            | Error::TypeMismatch { name, .. }
            | Error::CreationForbidden { name }
            | Error::SectionImmutable { name }
            | Error::Coercion { name, .. } => name,
        }
    }
}
