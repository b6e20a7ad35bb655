//! Default message templates and violation codes.
//!
//! Templates double as message tokens: a [`MessageResolver`](crate::MessageResolver)
//! looks a token up in its locale tables and, when nothing is found, renders
//! the token itself. Placeholders are positional (`{0}`, `{1}`, ...).

/// Violation codes attached to engine and adapter violations.
pub mod codes {
    pub const MISSING_PROPERTY: &str = "missing_property";
    pub const UNKNOWN_PROPERTY: &str = "unknown_property";
    pub const UNWANTED_PROPERTY: &str = "unwanted_property";
    pub const ONLY_PROPERTY: &str = "only_property";
    pub const VALUE_CANNOT_BE_NULL: &str = "value_cannot_be_null";
    pub const INVALID_PROPERTY_NAME: &str = "invalid_property_name";

    pub const PROPERTY_VALUE_MUST_BE_STRING: &str = "property_value_must_be_string";
    pub const PROPERTY_VALUE_MUST_BE_NUMBER: &str = "property_value_must_be_number";
    pub const PROPERTY_VALUE_MUST_BE_INTEGER: &str = "property_value_must_be_integer";
    pub const PROPERTY_VALUE_MUST_BE_BOOLEAN: &str = "property_value_must_be_boolean";
    pub const PROPERTY_VALUE_MUST_BE_OBJECT: &str = "property_value_must_be_object";
    pub const PROPERTY_VALUE_MUST_BE_ARRAY: &str = "property_value_must_be_array";
    pub const PROPERTY_VALUE_MUST_BE_DATETIME: &str = "property_value_must_be_datetime";

    pub const MUST_BE_OBJECT: &str = "must_be_object";
    pub const MUST_BE_ARRAY: &str = "must_be_array";
    pub const MUST_BE_OBJECT_OR_ARRAY: &str = "must_be_object_or_array";
    pub const ARRAY_ELEMENT_MUST_BE_OBJECT: &str = "array_element_must_be_object";

    pub const ERROR_UNMARSHAL: &str = "error_unmarshal";
    pub const REQUEST_BODY_EMPTY: &str = "request_body_empty";
    pub const REQUEST_BODY_NULL: &str = "request_body_null";
    pub const REQUEST_BODY_TOO_LARGE: &str = "request_body_too_large";
    pub const REQUEST_QUERY_PARAM_MULTI_NOT_ALLOWED: &str = "request_query_param_multi_not_allowed";
    pub const REQUEST_QUERY_PARAM_INVALID_TYPE: &str = "request_query_param_invalid_type";

    pub const FAILING: &str = "failing";
    pub const CUSTOM: &str = "custom";
}

// Engine
pub const MSG_MISSING_PROPERTY: &str = "Missing property '{0}'";
pub const MSG_UNKNOWN_PROPERTY: &str = "Invalid property";
pub const MSG_UNWANTED_PROPERTY: &str = "Property must not be present";
pub const MSG_ONLY_PROPERTY: &str = "Property must be the only property present";
pub const MSG_VALUE_CANNOT_BE_NULL: &str = "Value cannot be null";
pub const MSG_INVALID_PROPERTY_NAME: &str = "Invalid property name";
pub const FMT_MSG_VALUE_EXPECTED_TYPE: &str = "Value expected to be of type {0}";
pub const MSG_PROPERTY_VALUE_MUST_BE_OBJECT: &str = "Property value must be an object";
pub const MSG_PROPERTY_VALUE_MUST_BE_ARRAY: &str = "Property value must be an array";
pub const MSG_PROPERTY_VALUE_MUST_BE_OBJECT_OR_ARRAY: &str =
    "Property value must be an object or array";
pub const MSG_ARRAY_ELEMENT_MUST_BE_OBJECT: &str = "Array element must be an object";
pub const MSG_EXPECTED_JSON_OBJECT: &str = "Expected JSON object";
pub const MSG_EXPECTED_JSON_ARRAY: &str = "Expected JSON array";
pub const MSG_EXPECTED_JSON_OBJECT_OR_ARRAY: &str = "Expected JSON object or array";

// Request surface
pub const MSG_REQUEST_BODY_EMPTY: &str = "Request body is empty";
pub const MSG_REQUEST_BODY_NOT_JSON_NULL: &str = "Request body must not be JSON null";
pub const FMT_MSG_UNABLE_TO_DECODE: &str = "Unable to decode request body: {0}";
pub const FMT_MSG_REQUEST_BODY_TOO_LARGE: &str = "Request body exceeds {0} bytes";
pub const MSG_QUERY_PARAM_MULTI_NOT_ALLOWED: &str =
    "Query param may not be specified more than once";
pub const FMT_MSG_QUERY_PARAM_TYPE: &str = "Query param must be of type {0}";

// Flow control
pub const MSG_FAILING: &str = "Failed";
pub const MSG_CUSTOM: &str = "Value is invalid";

// Presence / size
pub const MSG_NOT_EMPTY: &str = "Value must not be empty";
pub const MSG_NOT_BLANK: &str = "String value must not be blank";
pub const FMT_MSG_STRING_MIN_LEN: &str = "String value length must be at least {0} characters";
pub const FMT_MSG_STRING_MAX_LEN: &str = "String value length must not exceed {0} characters";
pub const FMT_MSG_ARRAY_MIN_LEN: &str = "Array must have at least {0} elements";
pub const FMT_MSG_ARRAY_MAX_LEN: &str = "Array must not have more than {0} elements";
pub const MSG_DISTINCT_ITEMS: &str = "Array elements must be distinct";
pub const FMT_MSG_ARRAY_ELEMENT_TYPE: &str = "Array elements must be of type {0}";
pub const FMT_MSG_MIN_PROPERTIES: &str = "Object must have at least {0} properties";
pub const FMT_MSG_MAX_PROPERTIES: &str = "Object must not have more than {0} properties";

// Ordinal
pub const FMT_MSG_GT: &str = "Value must be greater than {0}";
pub const FMT_MSG_GTE: &str = "Value must be greater than or equal to {0}";
pub const FMT_MSG_LT: &str = "Value must be less than {0}";
pub const FMT_MSG_LTE: &str = "Value must be less than or equal to {0}";
pub const FMT_MSG_BETWEEN: &str = "Value must be between {0} and {1} (inclusive)";
pub const FMT_MSG_BETWEEN_EXCLUSIVE: &str = "Value must be between {0} and {1} (exclusive)";
pub const MSG_POSITIVE: &str = "Value must be positive";
pub const MSG_POSITIVE_OR_ZERO: &str = "Value must be positive or zero";
pub const MSG_NEGATIVE: &str = "Value must be negative";
pub const MSG_NEGATIVE_OR_ZERO: &str = "Value must be negative or zero";
pub const FMT_MSG_MULTIPLE_OF: &str = "Value must be a multiple of {0}";

// Patterns
pub const FMT_MSG_PATTERN: &str = "String value must match pattern {0}";
pub const FMT_MSG_VALID_TOKEN: &str = "String value must be one of [{0}]";
pub const MSG_LOWERCASE: &str = "String value must contain only lowercase letters";
pub const MSG_UPPERCASE: &str = "String value must contain only uppercase letters";

// Structured strings
pub const MSG_EMAIL: &str = "String value must be a valid email address";
pub const MSG_URL: &str = "String value must be a valid URL";
pub const MSG_UUID: &str = "String value must be a valid UUID";
pub const FMT_MSG_UUID_VERSION: &str = "String value must be a valid UUID (version {0})";
pub const MSG_IP: &str = "String value must be a valid IP address";
pub const MSG_IPV4: &str = "String value must be a valid IPv4 address";
pub const MSG_IPV6: &str = "String value must be a valid IPv6 address";
pub const MSG_CREDIT_CARD: &str = "String value must be a valid card number";
pub const MSG_ISO_DATE: &str = "String value must be a valid ISO date (YYYY-MM-DD)";
pub const MSG_ISO_DATETIME: &str = "String value must be a valid ISO datetime";
pub const MSG_ISO_DURATION: &str = "String value must be a valid ISO duration";

// Code books
pub const MSG_CURRENCY: &str = "String value must be a valid ISO 4217 currency code";
pub const MSG_COUNTRY_CODE: &str = "String value must be a valid ISO 3166-1 country code";
pub const MSG_REGION_CODE: &str = "String value must be a valid ISO 3166-2 region code";

/// Renders a template by substituting positional `{n}` placeholders.
///
/// Placeholders without a matching argument are left untouched.
pub fn render(template: &str, args: &[String]) -> String {
    if args.is_empty() || !template.contains('{') {
        return template.to_string();
    }
    // Single pass over the template; substituted text is never rescanned
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match arg {
            Some((arg, close)) => {
                result.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
