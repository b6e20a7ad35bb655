//! Request body and query validation.

use crate::config::HttpConfig;
use crate::locale::resolve_locale;
use bytes::Bytes;
use http::Request;
use jsonvet_core::messages::{self, codes};
use jsonvet_core::{
    decode_query_with, DecodeError, QueryParams, Runtime, Schema, ValidationError, Violation,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Providers and settings used to validate requests.
///
/// ```rust,ignore
/// let validator = HttpValidator::new()
///     .with_runtime(Runtime::new().with_resolver(catalog))
///     .with_config(HttpConfig::from_env()?);
///
/// let body = schema.request_validate_with(&req, &validator)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpValidator {
    runtime: Runtime,
    config: HttpConfig,
}

impl HttpValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_config(mut self, config: HttpConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Decode the request body as JSON and validate it.
    ///
    /// Returns the decoded body. Missing, oversized or undecodable bodies
    /// fail with a single bad-request violation.
    pub fn validate_body(&self, schema: &Schema, req: &Request<Bytes>) -> Result<Value, ValidationError> {
        let locale = self.locale(req);
        let locale = locale.as_deref();
        let body = req.body();

        if body.len() > self.config.max_body_bytes {
            let message = self.resolve(
                locale,
                messages::FMT_MSG_REQUEST_BODY_TOO_LARGE,
                &[self.config.max_body_bytes.to_string()],
            );
            tracing::debug!(len = body.len(), limit = self.config.max_body_bytes, "request body too large");
            return Err(bad_request(message, codes::REQUEST_BODY_TOO_LARGE));
        }

        let value = match self.runtime.decoder().decode_for(body, schema) {
            Ok(value) => value,
            Err(DecodeError::Empty) => {
                let message = self.resolve(locale, messages::MSG_REQUEST_BODY_EMPTY, &[]);
                return Err(bad_request(message, codes::REQUEST_BODY_EMPTY));
            }
            Err(err) => {
                tracing::debug!(error = %err, "request body is not valid JSON");
                let message =
                    self.resolve(locale, messages::FMT_MSG_UNABLE_TO_DECODE, &[err.to_string()]);
                return Err(bad_request(message, codes::ERROR_UNMARSHAL));
            }
        };

        if value.is_null() {
            if self.config.allow_null_json {
                return Ok(value);
            }
            let message = self.resolve(locale, messages::MSG_REQUEST_BODY_NOT_JSON_NULL, &[]);
            return Err(bad_request(message, codes::REQUEST_BODY_NULL));
        }

        schema.validate_with(&value, &self.runtime, locale)?;
        Ok(value)
    }

    /// [`validate_body`](Self::validate_body), then deserialize into `T`.
    pub fn validate_body_into<T: DeserializeOwned>(
        &self,
        schema: &Schema,
        req: &Request<Bytes>,
    ) -> Result<T, ValidationError> {
        let value = self.validate_body(schema, req)?;
        self.from_validated(value, self.locale(req).as_deref())
    }

    /// Build an object from the query string and validate it.
    ///
    /// Returns the canonical object. Parameters that cannot be coerced to
    /// their declared type fail with bad-request violations and the object is
    /// not validated.
    pub fn validate_query<B>(&self, schema: &Schema, req: &Request<B>) -> Result<Value, ValidationError> {
        if schema.root().disallow_object {
            tracing::warn!("query validation against a schema that disallows objects");
        }
        let locale = self.locale(req);
        let locale = locale.as_deref();

        let query = req.uri().query().unwrap_or("");
        let params = QueryParams::parse(query).map_err(|err| {
            let message =
                self.resolve(locale, messages::FMT_MSG_UNABLE_TO_DECODE, &[err.to_string()]);
            bad_request(message, codes::ERROR_UNMARSHAL)
        })?;

        let value = decode_query_with(&params, schema, self.runtime.resolver(), locale)
            .map_err(ValidationError::new)?;
        schema.validate_with(&value, &self.runtime, locale)?;
        Ok(value)
    }

    /// [`validate_query`](Self::validate_query), then deserialize into `T`.
    pub fn validate_query_into<T: DeserializeOwned, B>(
        &self,
        schema: &Schema,
        req: &Request<B>,
    ) -> Result<T, ValidationError> {
        let value = self.validate_query(schema, req)?;
        self.from_validated(value, self.locale(req).as_deref())
    }

    fn locale<B>(&self, req: &Request<B>) -> Option<String> {
        resolve_locale(req, self.config.default_locale.as_deref())
    }

    fn resolve(&self, locale: Option<&str>, token: &str, args: &[String]) -> String {
        self.runtime.resolver().resolve(locale, token, args)
    }

    // The value passed validation but does not fit the caller's type
    fn from_validated<T: DeserializeOwned>(
        &self,
        value: Value,
        locale: Option<&str>,
    ) -> Result<T, ValidationError> {
        serde_json::from_value(value).map_err(|err| {
            tracing::debug!(error = %err, "validated value does not fit the target type");
            let message =
                self.resolve(locale, messages::FMT_MSG_UNABLE_TO_DECODE, &[err.to_string()]);
            bad_request(message, codes::ERROR_UNMARSHAL)
        })
    }
}

fn bad_request(message: String, code: &str) -> ValidationError {
    ValidationError::single(Violation::bad_request("", "", message).with_code(code))
}

/// Request validation on a [`Schema`].
///
/// The plain methods use default providers and settings; the `_with`
/// methods take an [`HttpValidator`].
pub trait RequestValidate {
    fn request_validate_with(
        &self,
        req: &Request<Bytes>,
        validator: &HttpValidator,
    ) -> Result<Value, ValidationError>;

    fn request_query_validate_with<B>(
        &self,
        req: &Request<B>,
        validator: &HttpValidator,
    ) -> Result<Value, ValidationError>;

    /// Decode and validate the JSON body.
    fn request_validate(&self, req: &Request<Bytes>) -> Result<Value, ValidationError> {
        self.request_validate_with(req, &HttpValidator::default())
    }

    /// Decode and validate the JSON body, then deserialize it into `T`.
    fn request_validate_into<T: DeserializeOwned>(
        &self,
        req: &Request<Bytes>,
    ) -> Result<T, ValidationError> {
        let validator = HttpValidator::default();
        let value = self.request_validate_with(req, &validator)?;
        validator.from_validated(value, validator.locale(req).as_deref())
    }

    /// Validate the query string.
    fn request_query_validate<B>(&self, req: &Request<B>) -> Result<Value, ValidationError> {
        self.request_query_validate_with(req, &HttpValidator::default())
    }

    /// Validate the query string, then deserialize it into `T`.
    fn request_query_validate_into<T: DeserializeOwned, B>(
        &self,
        req: &Request<B>,
    ) -> Result<T, ValidationError> {
        let validator = HttpValidator::default();
        let value = self.request_query_validate_with(req, &validator)?;
        validator.from_validated(value, validator.locale(req).as_deref())
    }
}

impl RequestValidate for Schema {
    fn request_validate_with(
        &self,
        req: &Request<Bytes>,
        validator: &HttpValidator,
    ) -> Result<Value, ValidationError> {
        validator.validate_body(self, req)
    }

    fn request_query_validate_with<B>(
        &self,
        req: &Request<B>,
        validator: &HttpValidator,
    ) -> Result<Value, ValidationError> {
        validator.validate_query(self, req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonvet_core::{PropertyDescriptor, Validator};

    fn post(body: &'static str) -> Request<Bytes> {
        Request::post("/items").body(Bytes::from_static(body.as_bytes())).unwrap()
    }

    fn schema() -> Schema {
        Schema::new(Validator::new().property("name", PropertyDescriptor::string().mandatory())).unwrap()
    }

    fn first_code(err: &ValidationError) -> Value {
        err.violations[0].codes[0].clone()
    }

    #[test]
    fn empty_body() {
        let err = schema().request_validate(&post("")).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(first_code(&err), codes::REQUEST_BODY_EMPTY);
        assert_eq!(err.violations[0].message, messages::MSG_REQUEST_BODY_EMPTY);
    }

    #[test]
    fn malformed_body() {
        let err = schema().request_validate(&post("{\"name\":")).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(first_code(&err), codes::ERROR_UNMARSHAL);
        assert!(err.violations[0].message.starts_with("Unable to decode request body: "));
    }

    #[test]
    fn null_body() {
        let err = schema().request_validate(&post("null")).unwrap_err();
        assert_eq!(first_code(&err), codes::REQUEST_BODY_NULL);

        let lenient = HttpValidator::new().with_config(HttpConfig::new().allow_null_json(true));
        assert_eq!(schema().request_validate_with(&post("null"), &lenient).unwrap(), Value::Null);
    }

    #[test]
    fn oversized_body() {
        let small = HttpValidator::new().with_config(HttpConfig::new().max_body_bytes(8));
        let err = schema()
            .request_validate_with(&post("{\"name\": \"too long\"}"), &small)
            .unwrap_err();
        assert_eq!(first_code(&err), codes::REQUEST_BODY_TOO_LARGE);
        assert_eq!(err.violations[0].message, "Request body exceeds 8 bytes");
    }

    #[test]
    fn schema_violations_are_not_bad_requests() {
        let err = schema().request_validate(&post("{}")).unwrap_err();
        assert!(!err.is_bad_request());
        assert_eq!(first_code(&err), codes::MISSING_PROPERTY);
        assert!(schema().request_validate(&post("{\"name\": \"x\"}")).is_ok());
    }
}
