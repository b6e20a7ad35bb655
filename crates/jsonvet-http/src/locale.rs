//! Locale negotiation.

use http::header::ACCEPT_LANGUAGE;
use http::Request;
use jsonvet_core::parse_accept_language;

/// Preferred locale from the request's `Accept-Language` header.
pub fn request_locale<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_accept_language)
}

/// Request locale, falling back to a configured default.
pub fn resolve_locale<B>(req: &Request<B>, default_locale: Option<&str>) -> Option<String> {
    request_locale(req).or_else(|| default_locale.map(str::to_string))
}
