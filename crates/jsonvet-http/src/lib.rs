//! # jsonvet HTTP
//!
//! Validates `http::Request` bodies and query strings against a
//! [`jsonvet_core::Schema`], and maps failures to HTTP responses.
//!
//! ```rust,ignore
//! use jsonvet_http::{ErrorResponse, RequestValidate};
//!
//! match schema.request_validate(&req) {
//!     Ok(body) => handle(body),
//!     // 400 for undecodable input, 422 for schema violations
//!     Err(err) => ErrorResponse::from(err).into_response(),
//! }
//! ```
//!
//! ## Features
//!
//! - `config`: load [`HttpConfig`] from `JSONVET_*` environment variables
//!   and `.env` files

mod config;
mod error;
mod locale;
mod request;


pub use config::{HttpConfig, DEFAULT_MAX_BODY_BYTES, ENV_PREFIX};
#[cfg(feature = "config")]
pub use config::{load_dotenv, ConfigError};
pub use error::ErrorResponse;
pub use locale::{request_locale, resolve_locale};
pub use request::{HttpValidator, RequestValidate};
