//! Message resolution and localisation.

use crate::messages;
use std::collections::HashMap;
use std::fmt;

/// Trait for resolving message tokens into rendered messages.
///
/// A token is either a key known to the resolver or a format string. When the
/// resolver has no translation for the token it renders the token itself.
pub trait MessageResolver: Send + Sync {
    /// Resolve and render a message.
    ///
    /// # Arguments
    ///
    /// * `locale` - Optional language tag (e.g. `"fr"`, `"en-GB"`)
    /// * `token` - The message key or format string
    /// * `args` - Positional arguments for `{n}` placeholders
    fn resolve(&self, locale: Option<&str>, token: &str, args: &[String]) -> String;
}

/// Resolver that renders tokens as-is, without any translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl MessageResolver for DefaultResolver {
    fn resolve(&self, _locale: Option<&str>, token: &str, args: &[String]) -> String {
        messages::render(token, args)
    }
}

/// Per-locale translation tables.
///
/// Lookups try the exact tag first, then the primary language subtag, then
/// the token itself:
///
/// ```rust,ignore
/// let catalog = Catalog::new()
///     .translation("fr", messages::MSG_VALUE_CANNOT_BE_NULL, "La valeur ne peut pas être nulle");
///
/// catalog.resolve(Some("fr-CA"), messages::MSG_VALUE_CANNOT_BE_NULL, &[]);
/// // => "La valeur ne peut pas être nulle"
/// ```
#[derive(Clone, Default)]
pub struct Catalog {
    locales: HashMap<String, HashMap<String, String>>,
    fallback_locale: Option<String>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation for a token in a locale.
    pub fn translation(
        mut self,
        locale: impl Into<String>,
        token: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.add(locale, token, message);
        self
    }

    /// Add a translation in place.
    pub fn add(
        &mut self,
        locale: impl Into<String>,
        token: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.locales
            .entry(normalize_tag(&locale.into()))
            .or_default()
            .insert(token.into(), message.into());
    }

    /// Locale used when the caller does not supply one.
    pub fn fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(normalize_tag(&locale.into()));
        self
    }

    /// Whether any translations are registered for the locale.
    pub fn has_locale(&self, locale: &str) -> bool {
        let tag = normalize_tag(locale);
        self.locales.contains_key(&tag) || self.locales.contains_key(primary_subtag(&tag))
    }

    fn lookup(&self, locale: &str, token: &str) -> Option<&str> {
        let tag = normalize_tag(locale);
        self.locales
            .get(&tag)
            .and_then(|table| table.get(token))
            .or_else(|| {
                self.locales
                    .get(primary_subtag(&tag))
                    .and_then(|table| table.get(token))
            })
            .map(String::as_str)
    }
}

impl MessageResolver for Catalog {
    fn resolve(&self, locale: Option<&str>, token: &str, args: &[String]) -> String {
        let locale = locale.or(self.fallback_locale.as_deref());
        let template = locale
            .and_then(|l| self.lookup(l, token))
            .unwrap_or(token);
        messages::render(template, args)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("locales", &self.locales.keys().collect::<Vec<_>>())
            .field("fallback_locale", &self.fallback_locale)
            .finish()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Pick the preferred language tag from an `Accept-Language` header value.
///
/// Entries are ranked by their `q` weight; ties keep header order. Wildcards
/// and entries with `q=0` are ignored.
pub fn parse_accept_language(header: &str) -> Option<String> {
    let mut best: Option<(f32, &str)> = None;
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().map(str::trim).unwrap_or_default();
        if tag.is_empty() || tag == "*" {
            continue;
        }
        let mut quality = 1.0_f32;
        for param in parts {
            if let Some(q) = param.trim().strip_prefix("q=") {
                quality = q.trim().parse().unwrap_or(0.0);
            }
        }
        if quality <= 0.0 {
            continue;
        }
        if best.map_or(true, |(q, _)| quality > q) {
            best = Some((quality, tag));
        }
    }
    best.map(|(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolver_renders_token() {
        let msg = DefaultResolver.resolve(Some("de"), messages::FMT_MSG_GT, &["5".to_string()]);
        assert_eq!(msg, "Value must be greater than 5");
    }

    #[test]
    fn catalog_exact_and_language_fallback() {
        let catalog = Catalog::new()
            .translation("fr", messages::MSG_VALUE_CANNOT_BE_NULL, "La valeur ne peut pas être nulle")
            .translation("fr-CA", messages::MSG_NOT_EMPTY, "Valeur requise");

        assert_eq!(
            catalog.resolve(Some("fr-CA"), messages::MSG_VALUE_CANNOT_BE_NULL, &[]),
            "La valeur ne peut pas être nulle"
        );
        assert_eq!(
            catalog.resolve(Some("fr_CA"), messages::MSG_NOT_EMPTY, &[]),
            "Valeur requise"
        );
        assert_eq!(
            catalog.resolve(Some("de"), messages::MSG_NOT_EMPTY, &[]),
            messages::MSG_NOT_EMPTY
        );
        assert!(catalog.has_locale("FR"));
    }

    #[test]
    fn catalog_uses_fallback_locale() {
        let catalog = Catalog::new()
            .translation("es", messages::FMT_MSG_GT, "El valor debe ser mayor que {0}")
            .fallback_locale("es");
        assert_eq!(
            catalog.resolve(None, messages::FMT_MSG_GT, &["3".to_string()]),
            "El valor debe ser mayor que 3"
        );
    }

    #[test]
    fn accept_language_prefers_highest_quality() {
        assert_eq!(
            parse_accept_language("en;q=0.5, fr-CH, de;q=0.9").as_deref(),
            Some("fr-CH")
        );
        assert_eq!(parse_accept_language("*;q=1, it;q=0.2").as_deref(), Some("it"));
        assert_eq!(parse_accept_language("da;q=0"), None);
        assert_eq!(parse_accept_language(""), None);
    }
}
