//! HTTP error responses for validation failures.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use jsonvet_core::{ValidationError, Violation};
use serde::Serialize;

/// JSON error response for a failed validation.
///
/// A failure caused by undecodable input (any bad-request violation) is a
/// `400 Bad Request`; anything else is `422 Unprocessable Entity`:
///
/// ```json
/// {
///   "message": "Request validation failed",
///   "violations": [
///     {"property": "age", "path": "", "message": "Missing property 'age'", "codes": ["missing_property"]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    pub violations: Vec<Violation>,
}

impl ErrorResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Serialized response body.
    pub fn body(&self) -> Bytes {
        match serde_json::to_vec(self) {
            Ok(json) => Bytes::from(json),
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize error response");
                Bytes::from_static(b"{}")
            }
        }
    }

    /// Build an `http::Response` with a JSON body.
    pub fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.body());
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        response
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        let (status, message) = if err.is_bad_request() {
            (StatusCode::BAD_REQUEST, "Bad request")
        } else {
            (StatusCode::UNPROCESSABLE_ENTITY, "Request validation failed")
        };
        Self {
            status,
            message: message.to_string(),
            violations: err.violations,
        }
    }
}
