//! # jsonvet
//!
//! Declarative validation for JSON-shaped data: request bodies, query
//! strings and plain `serde_json::Value`s.
//!
//! Schemas describe objects property by property. Each property has an
//! expected type, presence rules and a list of constraints; conditions
//! raised while validating can switch other properties on or off, and
//! boolean expressions over sibling properties decide when a property is
//! required or unwanted.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonvet::prelude::*;
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     Validator::new()
//!         .property("email", PropertyDescriptor::string().mandatory().constraint(Rule::Email))
//!         .property("phone", PropertyDescriptor::string())
//!         .property(
//!             "sms_opt_in",
//!             PropertyDescriptor::boolean().unwanted_with(Expression::must_parse("!phone")),
//!         ),
//! )
//! .unwrap();
//!
//! assert!(schema.validate(&json!({"email": "a@example.com"})).is_ok());
//!
//! let err = schema
//!     .validate(&json!({"email": "a@example.com", "sms_opt_in": true}))
//!     .unwrap_err();
//! assert_eq!(err.violations[0].property, "sms_opt_in");
//! ```
//!
//! ## Expressions
//!
//! Terms are property names (present and not null), `~condition` tokens,
//! and parenthesised groups, joined by `&&`, `||` and `^^` and negated with
//! `!`. Operators have no precedence: an expression is folded strictly
//! left to right, so `a || b && c` means `(a || b) && c`.
//!
//! ## Optional Features
//!
//! - `tracing` (default) - debug and trace events from the engine
//! - `config` - load HTTP settings from `JSONVET_*` environment variables
//! - `full` - all optional features enabled

// Re-export core functionality
pub use jsonvet_core::*;

// Re-export the HTTP surface
pub use jsonvet_http::{
    request_locale, resolve_locale, ErrorResponse, HttpConfig, HttpValidator, RequestValidate,
    DEFAULT_MAX_BODY_BYTES, ENV_PREFIX,
};

#[cfg(feature = "config")]
pub use jsonvet_http::{load_dotenv, ConfigError};

// Re-export commonly used external crates
pub use serde;
pub use serde_json;
pub use tracing;

/// Prelude module - import everything you need with `use jsonvet::prelude::*`
pub mod prelude {
    pub use jsonvet_core::prelude::*;

    pub use jsonvet_core::{Catalog, MessageResolver, QueryParams};
    pub use jsonvet_http::{ErrorResponse, HttpConfig, HttpValidator, RequestValidate};

    pub use serde_json::{json, Value};
}
