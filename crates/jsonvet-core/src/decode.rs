//! Body decoding.
//!
//! A [`DecoderProvider`] turns raw bytes into a [`Value`] before validation.
//! The default [`JsonDecoder`] is backed by `serde_json`.

use crate::error::DecodeError;
use crate::json_type::is_integral;
use crate::validator::Schema;
use serde_json::{Number, Value};

/// Options a decoder is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Keep decimal literals exactly as written
    pub use_number: bool,
    /// Hint for typed decoders; untyped decoding always keeps every key
    pub ignore_unknown_properties: bool,
}

impl DecodeOptions {
    /// Options derived from a schema's root validator.
    pub fn for_schema(schema: &Schema) -> Self {
        let root = schema.root();
        Self {
            use_number: root.use_number,
            ignore_unknown_properties: root.ignore_unknown_properties,
        }
    }
}

/// Decodes request bodies.
pub trait DecoderProvider: Send + Sync {
    fn decode(&self, input: &[u8], options: DecodeOptions) -> Result<Value, DecodeError>;

    /// Decode with options taken from the schema.
    fn decode_for(&self, input: &[u8], schema: &Schema) -> Result<Value, DecodeError> {
        self.decode(input, DecodeOptions::for_schema(schema))
    }
}

/// `serde_json` decoder.
///
/// Without `use_number`, non-integral numbers are rounded to the nearest
/// `f64`, as a plain float decoder would.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl DecoderProvider for JsonDecoder {
    fn decode(&self, input: &[u8], options: DecodeOptions) -> Result<Value, DecodeError> {
        if input.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::Empty);
        }
        let mut value: Value = serde_json::from_slice(input)?;
        if !options.use_number {
            normalize_numbers(&mut value);
        }
        Ok(value)
    }
}

fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if !is_integral(n) => {
            if let Some(f) = n.as_f64().and_then(Number::from_f64) {
                *n = f;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use serde_json::json;

    const PRECISE: &[u8] = br#"{"a": 0.10000000000000000001, "b": [12345678901234567890123]}"#;

    #[test]
    fn empty_input() {
        assert!(matches!(
            JsonDecoder.decode(b"", DecodeOptions::default()),
            Err(DecodeError::Empty)
        ));
        assert!(matches!(
            JsonDecoder.decode(b"  \n", DecodeOptions::default()),
            Err(DecodeError::Empty)
        ));
    }

    #[test]
    fn malformed_input() {
        let err = JsonDecoder
            .decode(b"{\"a\":", DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn floats_are_normalized_by_default() {
        let value = JsonDecoder.decode(PRECISE, DecodeOptions::default()).unwrap();
        assert_eq!(value["a"], json!(0.1));
        assert_eq!(value["b"][0].to_string(), "12345678901234567890123");
    }

    #[test]
    fn use_number_keeps_literals() {
        let schema = Schema::new(Validator::new().use_number()).unwrap();
        let value = JsonDecoder.decode_for(PRECISE, &schema).unwrap();
        assert_eq!(value["a"].to_string(), "0.10000000000000000001");
    }
}
