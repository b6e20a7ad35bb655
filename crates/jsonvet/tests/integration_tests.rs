//! Integration tests for the jsonvet facade
//!
//! These tests cover flows that cross the core engine and the HTTP surface.

use bytes::Bytes;
use http::{Request, StatusCode};
use jsonvet::messages::codes;
use jsonvet::prelude::*;
use std::collections::HashSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("jsonvet=trace")
        .with_test_writer()
        .try_init();
}

fn post(body: &'static str) -> Request<Bytes> {
    Request::post("/").body(Bytes::from_static(body.as_bytes())).unwrap()
}

// ============================================================================
// Body validation
// ============================================================================

mod body_tests {
    use super::*;

    fn signup_schema() -> Schema {
        Schema::new(
            Validator::new()
                .property(
                    "email",
                    PropertyDescriptor::string().mandatory().constraint(Rule::Email),
                )
                .property("phone", PropertyDescriptor::string())
                .property(
                    "sms_opt_in",
                    PropertyDescriptor::boolean().unwanted_with(Expression::must_parse("!phone")),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_body_passes_through() {
        init_tracing();
        let body = signup_schema()
            .request_validate(&post(r#"{"email": "a@example.com", "phone": "555", "sms_opt_in": true}"#))
            .unwrap();
        assert_eq!(body["sms_opt_in"], json!(true));
    }

    #[test]
    fn test_schema_failures_render_as_422() {
        init_tracing();
        let err = signup_schema()
            .request_validate(&post(r#"{"sms_opt_in": true}"#))
            .unwrap_err();

        let response = ErrorResponse::from(err).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Request validation failed");
        let found: HashSet<(String, Value)> = body["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| (v["property"].as_str().unwrap().to_string(), v["codes"][0].clone()))
            .collect();
        let expected: HashSet<(String, Value)> = [
            ("email".to_string(), json!(codes::MISSING_PROPERTY)),
            ("sms_opt_in".to_string(), json!(codes::UNWANTED_PROPERTY)),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
        // bad_request never leaks into the body
        assert!(body["violations"][0].get("bad_request").is_none());
    }

    #[test]
    fn test_malformed_body_renders_as_400() {
        let err = signup_schema().request_validate(&post("{")).unwrap_err();
        assert!(err.is_bad_request());

        let response = ErrorResponse::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Bad request");
        assert_eq!(body["violations"][0]["codes"][0], json!(codes::ERROR_UNMARSHAL));
    }

    #[test]
    fn test_null_body_policy() {
        let schema = signup_schema();
        let err = schema.request_validate(&post("null")).unwrap_err();
        assert!(err.violations[0].has_code(codes::REQUEST_BODY_NULL));

        let lenient = HttpValidator::new().with_config(HttpConfig::new().allow_null_json(true));
        let body = schema.request_validate_with(&post("null"), &lenient).unwrap();
        assert_eq!(body, Value::Null);
    }
}

// ============================================================================
// Recursive schemas
// ============================================================================

mod recursive_tests {
    use super::*;

    fn tree_schema() -> Schema {
        let mut builder = SchemaBuilder::new();
        let node = builder.reserve();
        builder
            .define(
                node,
                Validator::new()
                    .allow_array()
                    .property(
                        "name",
                        PropertyDescriptor::string().mandatory().constraint(Rule::min_length(1)),
                    )
                    .property("children", PropertyDescriptor::array().validator(node)),
            )
            .unwrap();
        builder.build(node).unwrap()
    }

    #[test]
    fn test_nested_paths() {
        init_tracing();
        let input = json!({
            "name": "root",
            "children": [
                {"name": "a", "children": [{"name": "a1"}, {"name": ""}]},
                {"name": "b"}
            ]
        });
        let err = tree_schema().validate(&input).unwrap_err();
        assert_eq!(err.len(), 1);
        let v = &err.violations[0];
        assert_eq!(v.property, "name");
        assert_eq!(v.path, "children[0].children[1]");
        assert_eq!(v.full_path(), "children[0].children[1].name");
    }

    #[test]
    fn test_unknown_property_in_nested_node() {
        let err = tree_schema()
            .validate(&json!({"name": "root", "children": [{"name": "a", "colour": "red"}]}))
            .unwrap_err();
        assert_eq!(err.violations[0].full_path(), "children[0].colour");
        assert!(err.violations[0].has_code(codes::UNKNOWN_PROPERTY));
    }
}

// ============================================================================
// Query strings
// ============================================================================

mod query_tests {
    use super::*;

    #[test]
    fn test_query_types_are_coerced() {
        let schema = Schema::new(
            Validator::new()
                .property("q", PropertyDescriptor::string().mandatory())
                .property("limit", PropertyDescriptor::integer().constraint(Rule::between(1, 100)))
                .property("exact", PropertyDescriptor::boolean()),
        )
        .unwrap();

        let req = Request::get("/search?q=lamp&limit=20&exact=false").body(()).unwrap();
        let value = schema.request_query_validate(&req).unwrap();
        assert_eq!(value, json!({"q": "lamp", "limit": 20, "exact": false}));

        let req = Request::get("/search?limit=500").body(()).unwrap();
        let err = schema.request_query_validate(&req).unwrap_err();
        assert!(!err.is_bad_request());
        let failing: HashSet<_> = err.iter().map(|v| v.property.as_str()).collect();
        assert_eq!(failing, HashSet::from(["q", "limit"]));
    }

    #[test]
    fn test_query_params_from_pairs() {
        let params: QueryParams = [("tag", "a"), ("tag", "b")].into_iter().collect();
        assert_eq!(params.get("tag").map(|v| v.len()), Some(2));
    }
}
