//! Expected JSON types and runtime kind checks.

use crate::messages::codes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// The type a property value is expected to have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonType {
    /// Any value (no type check)
    #[default]
    Any,
    String,
    /// Any numeric value
    Number,
    /// A number with zero fractional part
    Integer,
    Boolean,
    Object,
    Array,
    /// A string holding an ISO-8601 datetime
    Datetime,
}

impl JsonType {
    /// Type name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            JsonType::Any => "any",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Datetime => "datetime",
        }
    }

    /// Whether the value is of this type. Null is never of any type except `Any`.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            JsonType::Any => true,
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value.as_number().map_or(false, is_integral),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::Datetime => value.as_str().map_or(false, |s| parse_datetime(s).is_some()),
        }
    }

    /// Violation code for a type mismatch, if the type has one.
    pub fn mismatch_code(&self) -> Option<&'static str> {
        match self {
            JsonType::Any => None,
            JsonType::String => Some(codes::PROPERTY_VALUE_MUST_BE_STRING),
            JsonType::Number => Some(codes::PROPERTY_VALUE_MUST_BE_NUMBER),
            JsonType::Integer => Some(codes::PROPERTY_VALUE_MUST_BE_INTEGER),
            JsonType::Boolean => Some(codes::PROPERTY_VALUE_MUST_BE_BOOLEAN),
            JsonType::Object => Some(codes::PROPERTY_VALUE_MUST_BE_OBJECT),
            JsonType::Array => Some(codes::PROPERTY_VALUE_MUST_BE_ARRAY),
            JsonType::Datetime => Some(codes::PROPERTY_VALUE_MUST_BE_DATETIME),
        }
    }

    /// Whether the type is a scalar for the purposes of query decoding.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonType::Array | JsonType::Any)
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a number has no fractional part.
///
/// Judged on the literal digits, so arbitrary-precision input is exact:
/// `12.000`, `1e2` and `1.5e1` are integral, `12.5` and `1e-400` are not.
pub fn is_integral(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    let literal = n.to_string();
    let (mantissa, exponent) = match literal.split_once(['e', 'E']) {
        Some((m, e)) => (m, parse_exponent(e)),
        None => (literal.as_str(), 0),
    };
    let mantissa = mantissa.trim_start_matches('-');
    let (int_part, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let fraction = fraction.trim_end_matches('0');

    let digits = format!("{int_part}{fraction}");
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return true;
    }
    // value = significant * 10^(exponent - fraction digits); integral when the
    // trailing zeros cover any negative scale
    let trailing_zeros = (significant.len() - significant.trim_end_matches('0').len()) as i64;
    exponent
        .saturating_sub(fraction.len() as i64)
        .saturating_add(trailing_zeros)
        >= 0
}

// Exponents beyond i64 saturate; only their sign matters then
fn parse_exponent(e: &str) -> i64 {
    e.parse::<i64>().unwrap_or_else(|_| {
        if e.starts_with('-') {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Numeric value as `f64`, for ordinal comparisons.
pub fn as_f64(value: &Value) -> Option<f64> {
    value.as_number().and_then(Number::as_f64)
}

/// Parse an ISO-8601 datetime.
///
/// Accepts RFC 3339 (`2024-01-31T10:00:00Z`, with offset or fraction),
/// local datetimes without offset (interpreted as UTC) and plain dates
/// (midnight UTC).
pub fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_local_timezone(utc).single()?);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|naive| naive.and_local_timezone(utc).single())
}
