// models/src/errors.rs

pub use thiserror::Error;

use crate::identifiers::NodeType;

/// A validation error.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An identifier is not of the form `<Type>/<local-id>`.
    #[error("identifier '{0}' is invalid")]
    InvalidIdentifier(String),
    /// The type prefix of an identifier names no known node type.
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),
    /// The part after the type prefix is empty.
    #[error("{0} identifier has an empty local part")]
    EmptyLocalId(NodeType),
    /// A relation label that is not one of the enumerated relations.
    #[error("unknown relation '{0}'")]
    UnknownRelation(String),
    /// Float properties must be comparable.
    #[error("float property must not be NaN")]
    NanProperty,
}

/// A result that might be a `ValidationError`.
pub type ValidationResult<T> = Result<T, ValidationError>;
