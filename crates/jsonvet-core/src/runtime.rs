//! Injectable providers.

use crate::decode::{DecoderProvider, JsonDecoder};
use crate::i18n::{DefaultResolver, MessageResolver};
use std::fmt;
use std::sync::Arc;

/// Providers used by a validation call.
///
/// Cheap to clone; share one per application or build one per request.
///
/// ```rust,ignore
/// let runtime = Runtime::new()
///     .with_resolver(Catalog::new().translation("fr", MSG_VALUE_CANNOT_BE_NULL, "..."))
///     .with_default_locale("fr");
/// schema.validate_with(&value, &runtime, None)?;
/// ```
#[derive(Clone)]
pub struct Runtime {
    resolver: Arc<dyn MessageResolver>,
    decoder: Arc<dyn DecoderProvider>,
    default_locale: Option<String>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: impl MessageResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_decoder(mut self, decoder: impl DecoderProvider + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Locale used when a call does not name one.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn resolver(&self) -> &dyn MessageResolver {
        self.resolver.as_ref()
    }

    pub fn decoder(&self) -> &dyn DecoderProvider {
        self.decoder.as_ref()
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.default_locale.as_deref()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            resolver: Arc::new(DefaultResolver),
            decoder: Arc::new(JsonDecoder),
            default_locale: None,
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("default_locale", &self.default_locale)
            .finish_non_exhaustive()
    }
}
