//! Query-string decoding.
//!
//! Turns raw query parameters into a JSON object shaped by the root
//! validator's property descriptors, ready for ordinary validation:
//!
//! ```rust
//! use jsonvet_core::{decode_query, PropertyDescriptor, QueryParams, Schema, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     Validator::new()
//!         .property("limit", PropertyDescriptor::integer())
//!         .property("active", PropertyDescriptor::boolean()),
//! )
//! .unwrap();
//!
//! let params = QueryParams::parse("limit=10&active&tag=a&tag=b").unwrap();
//! let value = decode_query(&params, &schema).unwrap();
//! assert_eq!(value, json!({"limit": 10, "active": true, "tag": ["a", "b"]}));
//! ```

use crate::i18n::{DefaultResolver, MessageResolver};
use crate::json_type::JsonType;
use crate::messages::{self, codes};
use crate::property::PropertyDescriptor;
use crate::validator::Schema;
use crate::violation::Violation;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Query parameters as an ordered multi-map.
///
/// Names keep the order of their first appearance, values keep their
/// order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
        Ok(pairs.into_iter().collect())
    }

    /// Append a value for a name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

/// Build the canonical object for a set of query parameters.
pub fn decode_query(params: &QueryParams, schema: &Schema) -> Result<Value, Vec<Violation>> {
    decode_query_with(params, schema, &DefaultResolver, None)
}

/// [`decode_query`] with an explicit message resolver and locale.
///
/// Any violation returned is a bad-request violation.
pub fn decode_query_with(
    params: &QueryParams,
    schema: &Schema,
    resolver: &dyn MessageResolver,
    locale: Option<&str>,
) -> Result<Value, Vec<Violation>> {
    let mut decoder = QueryDecoder {
        resolver,
        locale,
        violations: Vec::new(),
    };
    let mut object = Map::new();
    let properties = &schema.root().properties;

    for (name, values) in params.iter() {
        let decoded = match properties.get(name) {
            None => Some(untyped(values)),
            Some(descriptor) => decoder.typed(name, descriptor, values),
        };
        if let Some(value) = decoded {
            object.insert(name.to_string(), value);
        }
    }

    if decoder.violations.is_empty() {
        Ok(Value::Object(object))
    } else {
        trace_debug!(violations = decoder.violations.len(), "query decoding failed");
        Err(decoder.violations)
    }
}

// Parameters without a descriptor keep their raw strings; a bare flag is `true`
fn untyped(values: &[String]) -> Value {
    match values {
        [single] => flag_or_string(single),
        many if many.iter().all(String::is_empty) => {
            Value::Array(many.iter().map(|_| Value::Bool(true)).collect())
        }
        many => Value::Array(many.iter().cloned().map(Value::String).collect()),
    }
}

fn flag_or_string(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Bool(true)
    } else {
        Value::String(raw.to_string())
    }
}

struct QueryDecoder<'r> {
    resolver: &'r dyn MessageResolver,
    locale: Option<&'r str>,
    violations: Vec<Violation>,
}

impl QueryDecoder<'_> {
    fn typed(
        &mut self,
        name: &str,
        descriptor: &PropertyDescriptor,
        values: &[String],
    ) -> Option<Value> {
        if descriptor.json_type == JsonType::Array {
            let element = descriptor.element_type();
            let items = values
                .iter()
                .filter_map(|raw| self.coerce(name, element, raw))
                .collect();
            return Some(Value::Array(items));
        }

        match values {
            [single] => self.coerce(name, descriptor.json_type, single),
            _ if descriptor.json_type.is_scalar() => {
                let message = self.resolver.resolve(
                    self.locale,
                    messages::MSG_QUERY_PARAM_MULTI_NOT_ALLOWED,
                    &[],
                );
                self.violations.push(
                    Violation::bad_request(name, "", message)
                        .with_code(codes::REQUEST_QUERY_PARAM_MULTI_NOT_ALLOWED),
                );
                None
            }
            many => Some(untyped(many)),
        }
    }

    // `None` means the value is skipped (or could not be coerced)
    fn coerce(&mut self, name: &str, json_type: JsonType, raw: &str) -> Option<Value> {
        match json_type {
            JsonType::Any | JsonType::String => Some(Value::String(raw.to_string())),
            JsonType::Number | JsonType::Integer => Some(
                Number::from_str(raw)
                    .map(Value::Number)
                    .unwrap_or_else(|_| Value::String(raw.to_string())),
            ),
            JsonType::Boolean => match raw {
                "" | "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(Value::Bool(true)),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(Value::Bool(false)),
                _ => self.invalid(name, json_type),
            },
            // Unparseable datetimes stay strings and fail the type check
            JsonType::Datetime => Some(Value::String(raw.to_string())),
            JsonType::Object => self.json(name, json_type, raw, Value::is_object),
            JsonType::Array => self.json(name, json_type, raw, Value::is_array),
        }
    }

    fn json(
        &mut self,
        name: &str,
        json_type: JsonType,
        raw: &str,
        shape: fn(&Value) -> bool,
    ) -> Option<Value> {
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) if shape(&value) => Some(value),
            _ => self.invalid(name, json_type),
        }
    }

    fn invalid(&mut self, name: &str, json_type: JsonType) -> Option<Value> {
        let message = self.resolver.resolve(
            self.locale,
            messages::FMT_MSG_QUERY_PARAM_TYPE,
            &[json_type.to_string()],
        );
        self.violations.push(
            Violation::bad_request(name, "", message)
                .with_code(codes::REQUEST_QUERY_PARAM_INVALID_TYPE),
        );
        None
    }
}
