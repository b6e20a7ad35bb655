//! # jsonvet core
//!
//! Declarative validation of JSON-shaped data. A [`Schema`] is an arena of
//! [`Validator`]s, each describing an object through its
//! [`PropertyDescriptor`]s and [`Constraint`]s. Validation walks the value
//! depth first and collects every [`Violation`] it finds.
//!
//! This crate has no HTTP surface. Use `jsonvet` for the full stack.
//!
//! ## Example
//!
//! ```rust
//! use jsonvet_core::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     Validator::new()
//!         .property(
//!             "name",
//!             PropertyDescriptor::string()
//!                 .mandatory()
//!                 .not_null()
//!                 .constraint(Rule::length(1, 255)),
//!         )
//!         .property(
//!             "age",
//!             PropertyDescriptor::integer()
//!                 .mandatory()
//!                 .not_null()
//!                 .constraint(Rule::PositiveOrZero),
//!         ),
//! )
//! .unwrap();
//!
//! let err = schema.validate(&json!({"name": "Bilbo"})).unwrap_err();
//! assert_eq!(err.violations[0].message, "Missing property 'age'");
//! ```
//!
//! ## Conditions
//!
//! Constraints may raise named conditions on the path stack
//! ([`SetConditionFrom`], [`SetConditionProperty`]); descriptors are gated on
//! them with `when`/`unwanted_when`, and [`Expression`]s can test them with
//! `~name`. Schemas whose correctness depends on conditions raised by a
//! sibling property must enable [`Validator::ordered`].
//!
//! ## Features
//!
//! - `tracing` (default): debug and trace events from the engine

#[macro_use]
mod tracing_macros;

pub mod constraint;
mod context;
mod decode;
mod engine;
mod error;
pub mod expression;
pub mod i18n;
mod json_type;
pub mod messages;
mod property;
mod query;
mod runtime;
mod validator;
mod violation;


// Public API
pub use constraint::{
    Bound, Constraint, CustomConstraint, FailWhen, Failing, Failure, OnFail, Outcome, Pattern,
    Rule, RuleConstraint, SetConditionFrom, SetConditionProperty, VariablePropertyConstraint,
};
pub use context::{ConditionScope, Frame, PathSegment, ValidatorContext};
pub use decode::{DecodeOptions, DecoderProvider, JsonDecoder};
pub use error::{DecodeError, SchemaError};
pub use expression::{
    Anchor, ConditionLookup, Expression, Operator, OtherGrouping, OtherProperty, ParseError,
    PropertyPath, Reference, Term,
};
pub use i18n::{parse_accept_language, Catalog, DefaultResolver, MessageResolver};
pub use json_type::JsonType;
pub use property::PropertyDescriptor;
pub use query::{decode_query, decode_query_with, QueryParams};
pub use runtime::Runtime;
pub use validator::{Schema, SchemaBuilder, Validator, ValidatorId};
pub use violation::{sort_violations, ValidationError, Violation};

/// Prelude module for schema building and validation
pub mod prelude {
    pub use crate::constraint::{
        Constraint, OnFail, Rule, SetConditionFrom, SetConditionProperty,
        VariablePropertyConstraint,
    };
    pub use crate::context::{ConditionScope, ValidatorContext};
    pub use crate::error::SchemaError;
    pub use crate::expression::{Expression, OtherGrouping, OtherProperty};
    pub use crate::json_type::JsonType;
    pub use crate::property::PropertyDescriptor;
    pub use crate::runtime::Runtime;
    pub use crate::validator::{Schema, SchemaBuilder, Validator, ValidatorId};
    pub use crate::violation::{ValidationError, Violation};
}
