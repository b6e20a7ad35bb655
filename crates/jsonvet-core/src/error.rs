//! Error types for schema construction and body decoding.
//!
//! Validation failures are not errors in this sense: they are reported as
//! [`Violation`](crate::Violation)s inside a
//! [`ValidationError`](crate::ValidationError).

use thiserror::Error;

/// Errors raised while building a [`Schema`](crate::Schema).
///
/// These never occur during validation: a built schema is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A validator that neither accepts objects nor arrays
    #[error("validator {0} disallows objects but does not allow arrays")]
    IllFormedValidator(usize),

    /// A reference to a validator id that does not exist in the builder
    #[error("validator {referenced} referenced from {location} does not exist")]
    UnknownValidator { referenced: usize, location: String },

    /// A slot created by `reserve` that was never given a definition
    #[error("validator {0} was reserved but never defined")]
    UndefinedValidator(usize),

    /// A variable property constraint outside an object-level constraint list
    #[error("variable property constraint on {location} of validator {validator} only applies to objects")]
    MisplacedVariableProperty { validator: usize, location: String },

    /// A regular expression that does not compile
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Errors raised by a [`DecoderProvider`](crate::DecoderProvider).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No bytes to decode
    #[error("input is empty")]
    Empty,

    /// Input is not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
