//! Violation records and the validation error that carries them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single validation failure.
///
/// Serializes to:
///
/// ```json
/// { "property": "street", "path": "person[1].addresses[0]", "message": "...", "codes": ["missing_property"] }
/// ```
///
/// `bad_request` marks failures that happened before schema validation
/// (missing or undecodable input) and is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Name (or index) of the property that failed
    pub property: String,
    /// Dotted path of the object containing the property
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Whether the failure maps to HTTP 400 rather than 422
    #[serde(skip)]
    pub bad_request: bool,
    /// Machine-readable codes (strings, numbers, ...)
    #[serde(default)]
    pub codes: Vec<Value>,
}

impl Violation {
    /// Create an empty violation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a violation for a property at a path.
    pub fn new(
        property: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            path: path.into(),
            message: message.into(),
            bad_request: false,
            codes: Vec::new(),
        }
    }

    /// Create a bad-request violation.
    pub fn bad_request(
        property: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            bad_request: true,
            ..Self::new(property, path, message)
        }
    }

    /// Append a code.
    pub fn with_code(mut self, code: impl Into<Value>) -> Self {
        self.codes.push(code.into());
        self
    }

    /// Append several codes.
    pub fn with_codes<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        self.codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Whether the violation carries the given code.
    pub fn has_code(&self, code: impl Into<Value>) -> bool {
        let code = code.into();
        self.codes.iter().any(|c| *c == code)
    }

    /// Full dotted path of the property, e.g. `person[1].addresses[0].street`.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            self.property.clone()
        } else if self.property.is_empty() {
            self.path.clone()
        } else if self.property.bytes().all(|b| b.is_ascii_digit()) {
            format!("{}[{}]", self.path, self.property)
        } else {
            format!("{}.{}", self.path, self.property)
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.full_path();
        if path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", path, self.message)
        }
    }
}

/// Sort violations by path, then by property.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.property.cmp(&b.property)));
}

/// Validation failure carrying every violation found.
///
/// Violations are kept in the order the engine visited them; use
/// [`into_sorted`](Self::into_sorted) for a stable presentation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    /// Collected violations
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a validation error from violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Create a validation error holding a single violation.
    pub fn single(violation: Violation) -> Self {
        Self::new(vec![violation])
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation is a bad-request (pre-validation) failure.
    pub fn is_bad_request(&self) -> bool {
        self.violations.iter().any(|v| v.bad_request)
    }

    /// Violations sorted by path, then property.
    pub fn into_sorted(mut self) -> Vec<Violation> {
        sort_violations(&mut self.violations);
        self.violations
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} violation(s)", self.violations.len())
    }
}

impl std::error::Error for ValidationError {}

impl From<Vec<Violation>> for ValidationError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}

impl IntoIterator for ValidationError {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.violations.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn violation_creation() {
        let v = Violation::new("age", "", "Missing property 'age'").with_code("missing_property");
        assert_eq!(v.property, "age");
        assert!(!v.bad_request);
        assert!(v.has_code("missing_property"));
    }

    #[test]
    fn mixed_codes() {
        let v = Violation::empty().with_codes([json!("a"), json!(42)]).with_code(7);
        assert_eq!(v.codes, vec![json!("a"), json!(42), json!(7)]);
    }

    #[test]
    fn bad_request_is_not_serialized() {
        let v = Violation::bad_request("bool", "", "Query param must be of type boolean")
            .with_code("request_query_param_invalid_type");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            json!({
                "property": "bool",
                "path": "",
                "message": "Query param must be of type boolean",
                "codes": ["request_query_param_invalid_type"]
            })
        );
    }

    #[test]
    fn full_path_rendering() {
        assert_eq!(Violation::new("street", "person[1].addresses[0]", "x").full_path(), "person[1].addresses[0].street");
        assert_eq!(Violation::new("2", "items", "x").full_path(), "items[2]");
        assert_eq!(Violation::new("name", "", "x").full_path(), "name");
        assert_eq!(Violation::new("", "", "x").to_string(), "x");
    }

    #[test]
    fn sorting_by_path_then_property() {
        let mut violations = vec![
            Violation::new("name", "b", "1"),
            Violation::new("zed", "", "2"),
            Violation::new("age", "", "3"),
            Violation::new("amount", "a", "4"),
        ];
        sort_violations(&mut violations);
        let order: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(order, vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn validation_error_display_and_flags() {
        let err = ValidationError::new(vec![
            Violation::new("a", "", "x"),
            Violation::bad_request("b", "", "y"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 violation(s)");
        assert!(err.is_bad_request());
        assert_eq!(serde_json::to_value(&err).unwrap().as_array().unwrap().len(), 2);
    }
}
