//! HTTP validation settings.
//!
//! With the `config` feature the settings can be read from environment
//! variables prefixed with `JSONVET_`, optionally after loading a `.env`
//! file:
//!
//! ```ignore
//! use jsonvet_http::{load_dotenv, HttpConfig};
//!
//! load_dotenv();
//! // JSONVET_MAX_BODY_BYTES=65536 JSONVET_DEFAULT_LOCALE=fr
//! let config = HttpConfig::from_env()?;
//! ```

use serde::Deserialize;

/// Default request body limit (2 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Prefix of the environment variables read by `HttpConfig::from_env`
pub const ENV_PREFIX: &str = "JSONVET_";

/// Settings for request validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Larger bodies are rejected before decoding
    pub max_body_bytes: usize,
    /// Locale used when the request does not send `Accept-Language`
    pub default_locale: Option<String>,
    /// Accept a body that is JSON `null`
    pub allow_null_json: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            default_locale: None,
            allow_null_json: false,
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn allow_null_json(mut self, allow: bool) -> Self {
        self.allow_null_json = allow;
        self
    }
}

#[cfg(feature = "config")]
pub use env::{load_dotenv, ConfigError};

#[cfg(feature = "config")]
mod env {
    use super::{HttpConfig, ENV_PREFIX};
    use std::path::PathBuf;
    use thiserror::Error;

    /// Error type for configuration loading failures.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Environment variable deserialization failed
        #[error("Configuration error: {0}")]
        Env(#[from] envy::Error),
    }

    impl HttpConfig {
        /// Load settings from `JSONVET_*` environment variables.
        ///
        /// Unset variables keep their defaults.
        pub fn from_env() -> Result<Self, ConfigError> {
            Ok(envy::prefixed(ENV_PREFIX).from_env::<HttpConfig>()?)
        }

        /// Load settings from `(name, value)` pairs, with the same rules as
        /// [`from_env`](Self::from_env).
        pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
        where
            I: IntoIterator<Item = (String, String)>,
        {
            Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, HttpConfig>(vars)?)
        }
    }

    /// Load a `.env` file from the current directory or its parents.
    ///
    /// Returns the path of the loaded file; a missing file is not an error.
    pub fn load_dotenv() -> Option<PathBuf> {
        match dotenvy::dotenv() {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!(error = %err, "no .env file loaded");
                None
            }
        }
    }
}
