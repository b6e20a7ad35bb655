//! Built-in value rules.
//!
//! A [`Rule`] only judges values of the kind it is about: a string rule
//! passes numbers, an ordinal rule with a numeric bound passes strings, and
//! so on. Kind mismatches are the job of the property type check.

use super::codebooks;
use super::Failure;
use crate::error::SchemaError;
use crate::json_type::{as_f64, is_integral, parse_datetime, JsonType};
use crate::messages;
use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex is valid")
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url regex is valid")
    })
}

/// A compiled regular expression.
///
/// Compiled when constructed, so an invalid pattern is a schema error rather
/// than a validation-time failure. Serializes as the pattern source.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| SchemaError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.0.is_match(s)
    }
}

impl TryFrom<String> for Pattern {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.as_str().to_string()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

/// Comparison bound for ordinal rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Compared against numbers
    Number(f64),
    /// Compared lexically against strings
    Text(String),
    /// Compared against strings holding ISO-8601 datetimes
    Datetime(DateTime<FixedOffset>),
}

impl Bound {
    fn compare(&self, value: &Value) -> Option<Ordering> {
        match self {
            Bound::Number(bound) => as_f64(value)?.partial_cmp(bound),
            Bound::Text(bound) => Some(value.as_str()?.cmp(bound.as_str())),
            Bound::Datetime(bound) => Some(parse_datetime(value.as_str()?)?.cmp(bound)),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(n) => write!(f, "{}", n),
            Bound::Text(s) => f.write_str(s),
            Bound::Datetime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

impl From<i64> for Bound {
    fn from(n: i64) -> Self {
        Bound::Number(n as f64)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Bound::Number(f64::from(n))
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Number(n)
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Bound::Text(s.to_string())
    }
}

impl From<String> for Bound {
    fn from(s: String) -> Self {
        Bound::Text(s)
    }
}

impl From<DateTime<FixedOffset>> for Bound {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Bound::Datetime(dt)
    }
}

fn default_true() -> bool {
    true
}

/// A built-in value rule.
///
/// Rules serialize with a `rule` tag:
///
/// ```json
/// { "rule": "length", "min": 1, "max": 255 }
/// { "rule": "greater_than_or_equal", "value": { "number": 0 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Strings, arrays and objects must not be empty
    NotEmpty,
    /// Strings must contain a non-whitespace character
    NotBlank,
    /// String length in characters
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Number of array elements
    ArrayLength {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Array elements must be pairwise distinct
    DistinctItems,
    /// Every array element must be of a type
    ///
    /// Also tells the query decoder how to coerce repeated parameters.
    ArrayOf {
        of: JsonType,
        #[serde(default)]
        allow_null: bool,
    },
    /// Number of object properties
    PropertyCount {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    GreaterThan { value: Bound },
    GreaterThanOrEqual { value: Bound },
    LessThan { value: Bound },
    LessThanOrEqual { value: Bound },
    Between {
        min: Bound,
        max: Bound,
        #[serde(default)]
        exclusive: bool,
    },
    Positive,
    PositiveOrZero,
    Negative,
    NegativeOrZero,
    MultipleOf { of: i64 },
    Pattern { pattern: Pattern },
    /// String must be one of a fixed set of tokens
    ValidToken {
        tokens: Vec<String>,
        #[serde(default)]
        ignore_case: bool,
    },
    Lowercase,
    Uppercase,
    Email,
    Url,
    Uuid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<u8>,
    },
    /// IP address; when neither flag is set either family is accepted
    Ip {
        #[serde(default)]
        v4: bool,
        #[serde(default)]
        v6: bool,
    },
    /// Card number passing the Luhn checksum
    CreditCard,
    IsoDate,
    IsoDatetime,
    IsoDuration,
    /// ISO 4217 code; active alphabetic codes are always accepted
    Currency {
        #[serde(default)]
        historical: bool,
        #[serde(default)]
        numeric: bool,
        #[serde(default)]
        crypto: bool,
    },
    /// ISO 3166-1 code
    CountryCode {
        #[serde(default = "default_true")]
        alpha2: bool,
        #[serde(default)]
        alpha3: bool,
        #[serde(default)]
        numeric: bool,
    },
    /// ISO 3166-2 subdivision code of a country in
    /// [`codebooks::region_countries`]
    RegionCode,
}

impl Rule {
    /// String length between `min` and `max` characters (inclusive).
    pub fn length(min: usize, max: usize) -> Self {
        Rule::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min_length(min: usize) -> Self {
        Rule::Length {
            min: Some(min),
            max: None,
        }
    }

    pub fn max_length(max: usize) -> Self {
        Rule::Length {
            min: None,
            max: Some(max),
        }
    }

    pub fn array_length(min: Option<usize>, max: Option<usize>) -> Self {
        Rule::ArrayLength { min, max }
    }

    pub fn array_of(of: JsonType) -> Self {
        Rule::ArrayOf {
            of,
            allow_null: false,
        }
    }

    pub fn gt(value: impl Into<Bound>) -> Self {
        Rule::GreaterThan {
            value: value.into(),
        }
    }

    pub fn gte(value: impl Into<Bound>) -> Self {
        Rule::GreaterThanOrEqual {
            value: value.into(),
        }
    }

    pub fn lt(value: impl Into<Bound>) -> Self {
        Rule::LessThan {
            value: value.into(),
        }
    }

    pub fn lte(value: impl Into<Bound>) -> Self {
        Rule::LessThanOrEqual {
            value: value.into(),
        }
    }

    /// Inclusive range.
    pub fn between(min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Rule::Between {
            min: min.into(),
            max: max.into(),
            exclusive: false,
        }
    }

    /// Regex match; fails to build on an invalid pattern.
    pub fn pattern(pattern: &str) -> Result<Self, SchemaError> {
        Ok(Rule::Pattern {
            pattern: Pattern::new(pattern)?,
        })
    }

    /// Case-sensitive token membership.
    pub fn one_of<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::ValidToken {
            tokens: tokens.into_iter().map(Into::into).collect(),
            ignore_case: false,
        }
    }

    /// Active alphabetic ISO 4217 codes only.
    pub fn currency() -> Self {
        Rule::Currency {
            historical: false,
            numeric: false,
            crypto: false,
        }
    }

    /// Alpha-2 ISO 3166-1 codes only.
    pub fn country_code() -> Self {
        Rule::CountryCode {
            alpha2: true,
            alpha3: false,
            numeric: false,
        }
    }

    /// Machine-readable code attached to failures of this rule.
    pub fn code(&self) -> &'static str {
        match self {
            Rule::NotEmpty => "not_empty",
            Rule::NotBlank => "not_blank",
            Rule::Length { .. } => "length",
            Rule::ArrayLength { .. } => "array_length",
            Rule::DistinctItems => "distinct_items",
            Rule::ArrayOf { .. } => "array_of",
            Rule::PropertyCount { .. } => "property_count",
            Rule::GreaterThan { .. } => "greater_than",
            Rule::GreaterThanOrEqual { .. } => "greater_than_or_equal",
            Rule::LessThan { .. } => "less_than",
            Rule::LessThanOrEqual { .. } => "less_than_or_equal",
            Rule::Between { .. } => "between",
            Rule::Positive => "positive",
            Rule::PositiveOrZero => "positive_or_zero",
            Rule::Negative => "negative",
            Rule::NegativeOrZero => "negative_or_zero",
            Rule::MultipleOf { .. } => "multiple_of",
            Rule::Pattern { .. } => "pattern",
            Rule::ValidToken { .. } => "valid_token",
            Rule::Lowercase => "lowercase",
            Rule::Uppercase => "uppercase",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Uuid { .. } => "uuid",
            Rule::Ip { .. } => "ip",
            Rule::CreditCard => "credit_card",
            Rule::IsoDate => "iso_date",
            Rule::IsoDatetime => "iso_datetime",
            Rule::IsoDuration => "iso_duration",
            Rule::Currency { .. } => "currency",
            Rule::CountryCode { .. } => "country_code",
            Rule::RegionCode => "region_code",
        }
    }

    fn fail(&self, token: &str) -> Failure {
        Failure::new(token).with_code(self.code())
    }

    fn fail_with(&self, token: &str, args: Vec<String>) -> Failure {
        self.fail(token).with_args(args)
    }

    /// Check a value against the rule.
    pub fn check(&self, value: &Value) -> Result<(), Failure> {
        match self {
            Rule::NotEmpty => {
                let empty = match value {
                    Value::String(s) => s.is_empty(),
                    Value::Array(items) => items.is_empty(),
                    Value::Object(map) => map.is_empty(),
                    _ => false,
                };
                pass_if(!empty, || self.fail(messages::MSG_NOT_EMPTY))
            }
            Rule::NotBlank => {
                let blank = value.as_str().map_or(false, |s| s.trim().is_empty());
                pass_if(!blank, || self.fail(messages::MSG_NOT_BLANK))
            }
            Rule::Length { min, max } => match value.as_str() {
                Some(s) => self.check_size(
                    s.chars().count(),
                    *min,
                    *max,
                    messages::FMT_MSG_STRING_MIN_LEN,
                    messages::FMT_MSG_STRING_MAX_LEN,
                ),
                None => Ok(()),
            },
            Rule::ArrayLength { min, max } => match value.as_array() {
                Some(items) => self.check_size(
                    items.len(),
                    *min,
                    *max,
                    messages::FMT_MSG_ARRAY_MIN_LEN,
                    messages::FMT_MSG_ARRAY_MAX_LEN,
                ),
                None => Ok(()),
            },
            Rule::PropertyCount { min, max } => match value.as_object() {
                Some(map) => self.check_size(
                    map.len(),
                    *min,
                    *max,
                    messages::FMT_MSG_MIN_PROPERTIES,
                    messages::FMT_MSG_MAX_PROPERTIES,
                ),
                None => Ok(()),
            },
            Rule::DistinctItems => match value.as_array() {
                Some(items) => {
                    let mut seen = HashSet::with_capacity(items.len());
                    let distinct = items.iter().all(|item| seen.insert(item.to_string()));
                    pass_if(distinct, || self.fail(messages::MSG_DISTINCT_ITEMS))
                }
                None => Ok(()),
            },
            Rule::ArrayOf { of, allow_null } => match value.as_array() {
                Some(items) => {
                    let ok = items
                        .iter()
                        .all(|item| (item.is_null() && *allow_null) || of.matches(item));
                    pass_if(ok, || {
                        self.fail_with(messages::FMT_MSG_ARRAY_ELEMENT_TYPE, vec![of.to_string()])
                    })
                }
                None => Ok(()),
            },
            Rule::GreaterThan { value: bound } => {
                self.check_ordinal(value, bound, messages::FMT_MSG_GT, |o| o == Ordering::Greater)
            }
            Rule::GreaterThanOrEqual { value: bound } => {
                self.check_ordinal(value, bound, messages::FMT_MSG_GTE, |o| o != Ordering::Less)
            }
            Rule::LessThan { value: bound } => {
                self.check_ordinal(value, bound, messages::FMT_MSG_LT, |o| o == Ordering::Less)
            }
            Rule::LessThanOrEqual { value: bound } => {
                self.check_ordinal(value, bound, messages::FMT_MSG_LTE, |o| o != Ordering::Greater)
            }
            Rule::Between {
                min,
                max,
                exclusive,
            } => {
                let above = min.compare(value).map_or(true, |o| {
                    o == Ordering::Greater || (!exclusive && o == Ordering::Equal)
                });
                let below = max.compare(value).map_or(true, |o| {
                    o == Ordering::Less || (!exclusive && o == Ordering::Equal)
                });
                let token = if *exclusive {
                    messages::FMT_MSG_BETWEEN_EXCLUSIVE
                } else {
                    messages::FMT_MSG_BETWEEN
                };
                pass_if(above && below, || {
                    self.fail_with(token, vec![min.to_string(), max.to_string()])
                })
            }
            Rule::Positive => self.check_sign(value, messages::MSG_POSITIVE, |n| n > 0.0),
            Rule::PositiveOrZero => {
                self.check_sign(value, messages::MSG_POSITIVE_OR_ZERO, |n| n >= 0.0)
            }
            Rule::Negative => self.check_sign(value, messages::MSG_NEGATIVE, |n| n < 0.0),
            Rule::NegativeOrZero => {
                self.check_sign(value, messages::MSG_NEGATIVE_OR_ZERO, |n| n <= 0.0)
            }
            Rule::MultipleOf { of } => match value.as_number() {
                Some(n) => pass_if(is_multiple_of(n, *of), || {
                    self.fail_with(messages::FMT_MSG_MULTIPLE_OF, vec![of.to_string()])
                }),
                None => Ok(()),
            },
            Rule::Pattern { pattern } => self.check_str(value, |s| pattern.is_match(s), || {
                self.fail_with(messages::FMT_MSG_PATTERN, vec![pattern.as_str().to_string()])
            }),
            Rule::ValidToken {
                tokens,
                ignore_case,
            } => self.check_str(
                value,
                |s| {
                    tokens.iter().any(|t| {
                        if *ignore_case {
                            t.to_lowercase() == s.to_lowercase()
                        } else {
                            t == s
                        }
                    })
                },
                || self.fail_with(messages::FMT_MSG_VALID_TOKEN, vec![tokens.join(", ")]),
            ),
            Rule::Lowercase => self.check_str(
                value,
                |s| !s.chars().any(char::is_uppercase),
                || self.fail(messages::MSG_LOWERCASE),
            ),
            Rule::Uppercase => self.check_str(
                value,
                |s| !s.chars().any(char::is_lowercase),
                || self.fail(messages::MSG_UPPERCASE),
            ),
            Rule::Email => self.check_str(
                value,
                |s| email_regex().is_match(s),
                || self.fail(messages::MSG_EMAIL),
            ),
            Rule::Url => self.check_str(
                value,
                |s| url_regex().is_match(s),
                || self.fail(messages::MSG_URL),
            ),
            Rule::Uuid { version } => self.check_str(
                value,
                |s| {
                    uuid::Uuid::try_parse(s).map_or(false, |u| {
                        version.map_or(true, |v| u.get_version_num() == usize::from(v))
                    })
                },
                || match version {
                    Some(v) => self.fail_with(messages::FMT_MSG_UUID_VERSION, vec![v.to_string()]),
                    None => self.fail(messages::MSG_UUID),
                },
            ),
            Rule::Ip { v4, v6 } => {
                let (accept_v4, accept_v6, token) = match (v4, v6) {
                    (true, false) => (true, false, messages::MSG_IPV4),
                    (false, true) => (false, true, messages::MSG_IPV6),
                    _ => (true, true, messages::MSG_IP),
                };
                self.check_str(
                    value,
                    |s| {
                        (accept_v4 && s.parse::<Ipv4Addr>().is_ok())
                            || (accept_v6 && s.parse::<Ipv6Addr>().is_ok())
                    },
                    || self.fail(token),
                )
            }
            Rule::CreditCard => {
                self.check_str(value, is_luhn_card, || self.fail(messages::MSG_CREDIT_CARD))
            }
            Rule::IsoDate => self.check_str(
                value,
                |s| s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
                || self.fail(messages::MSG_ISO_DATE),
            ),
            Rule::IsoDatetime => self.check_str(
                value,
                |s| s.contains('T') && parse_datetime(s).is_some(),
                || self.fail(messages::MSG_ISO_DATETIME),
            ),
            Rule::IsoDuration => {
                self.check_str(value, is_iso_duration, || self.fail(messages::MSG_ISO_DURATION))
            }
            Rule::Currency {
                historical,
                numeric,
                crypto,
            } => self.check_str(
                value,
                |s| {
                    codebooks::is_currency(s)
                        || (*historical && codebooks::is_historical_currency(s))
                        || (*numeric && codebooks::is_currency_numeric(s))
                        || (*crypto && codebooks::is_crypto_currency(s))
                },
                || self.fail(messages::MSG_CURRENCY),
            ),
            Rule::CountryCode {
                alpha2,
                alpha3,
                numeric,
            } => self.check_str(
                value,
                |s| {
                    (*alpha2 && codebooks::is_country_alpha2(s))
                        || (*alpha3 && codebooks::is_country_alpha3(s))
                        || (*numeric && codebooks::is_country_numeric(s))
                },
                || self.fail(messages::MSG_COUNTRY_CODE),
            ),
            Rule::RegionCode => self.check_str(
                value,
                codebooks::is_region_code,
                || self.fail(messages::MSG_REGION_CODE),
            ),
        }
    }

    fn check_size(
        &self,
        size: usize,
        min: Option<usize>,
        max: Option<usize>,
        min_token: &str,
        max_token: &str,
    ) -> Result<(), Failure> {
        if let Some(min) = min {
            if size < min {
                return Err(self.fail_with(min_token, vec![min.to_string()]));
            }
        }
        if let Some(max) = max {
            if size > max {
                return Err(self.fail_with(max_token, vec![max.to_string()]));
            }
        }
        Ok(())
    }

    fn check_ordinal(
        &self,
        value: &Value,
        bound: &Bound,
        token: &str,
        accept: impl Fn(Ordering) -> bool,
    ) -> Result<(), Failure> {
        let ok = bound.compare(value).map_or(true, accept);
        pass_if(ok, || self.fail_with(token, vec![bound.to_string()]))
    }

    fn check_sign(
        &self,
        value: &Value,
        token: &str,
        accept: impl Fn(f64) -> bool,
    ) -> Result<(), Failure> {
        let ok = as_f64(value).map_or(true, accept);
        pass_if(ok, || self.fail(token))
    }

    fn check_str(
        &self,
        value: &Value,
        accept: impl Fn(&str) -> bool,
        failure: impl FnOnce() -> Failure,
    ) -> Result<(), Failure> {
        match value.as_str() {
            Some(s) => pass_if(accept(s), failure),
            None => Ok(()),
        }
    }
}

fn pass_if(ok: bool, failure: impl FnOnce() -> Failure) -> Result<(), Failure> {
    if ok {
        Ok(())
    } else {
        Err(failure())
    }
}

fn is_multiple_of(n: &serde_json::Number, of: i64) -> bool {
    let exact = n
        .as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from));
    match exact {
        Some(v) if of == 0 => v == 0,
        Some(v) => v % i128::from(of) == 0,
        None if !is_integral(n) => false,
        None => n.as_f64().map_or(false, |f| {
            if of == 0 {
                f == 0.0
            } else {
                f % (of as f64) == 0.0
            }
        }),
    }
}

fn is_luhn_card(s: &str) -> bool {
    let digits: Option<Vec<u32>> = s
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .map(|c| c.to_digit(10))
        .collect();
    let Some(digits) = digits else {
        return false;
    };
    if !(12..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// `PnYnMnWnDTnHnMnS`; at least one component, and `T` must be followed by one.
fn is_iso_duration(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('P') else {
        return false;
    };
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };
    let Some(date_count) = duration_components(date, &['Y', 'M', 'W', 'D']) else {
        return false;
    };
    match time {
        None => date_count > 0,
        Some(time) => duration_components(time, &['H', 'M', 'S']).map_or(false, |n| n > 0),
    }
}

// Count of `<digits><designator>` components, designators in order;
// only the last designator may carry a decimal fraction
fn duration_components(part: &str, designators: &[char]) -> Option<usize> {
    let mut count = 0;
    let mut next = 0;
    let mut digits = String::new();
    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            digits.push(c);
            continue;
        }
        let index = designators[next..].iter().position(|d| *d == c)? + next;
        let fractional = digits.contains(['.', ',']);
        if digits.is_empty()
            || digits.starts_with(['.', ','])
            || digits.ends_with(['.', ','])
            || (fractional && index != designators.len() - 1)
            || digits.matches(['.', ',']).count() > 1
        {
            return None;
        }
        digits.clear();
        count += 1;
        next = index + 1;
    }
    if digits.is_empty() {
        Some(count)
    } else {
        None
    }
}
