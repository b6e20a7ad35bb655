//! The validation walk.
//!
//! Depth first, left to right. Every frame pushed here is popped on the same
//! call level, whatever happened in between, so the path stack is empty when
//! [`run`] returns.

use crate::constraint::{Constraint, OnFail, Outcome, VariablePropertyConstraint};
use crate::context::ValidatorContext;
use crate::messages::{self, codes};
use crate::property::PropertyDescriptor;
use crate::validator::Validator;
use serde_json::{Map, Value};

/// Which shapes the root value may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootMode {
    /// As the root validator's flags say
    Auto,
    /// An object, whatever the flags say
    Object,
    /// An array of objects, whatever the flags say
    Array,
}

pub(crate) fn run(ctx: &mut ValidatorContext<'_>, mode: RootMode) {
    let validator = ctx.schema().root();
    let root = ctx.root();
    let (accepts_object, accepts_array) = match mode {
        RootMode::Auto => (!validator.disallow_object, validator.allow_array),
        RootMode::Object => (true, false),
        RootMode::Array => (false, true),
    };

    ctx.push_root(root);
    match root {
        Value::Object(map) if accepts_object => validate_object(ctx, validator, root, map),
        Value::Array(items) if accepts_array => validate_elements(ctx, validator, items),
        Value::Null if validator.allow_null => {}
        Value::Null => {
            let message = ctx.resolve(messages::MSG_VALUE_CANNOT_BE_NULL, &[]);
            ctx.add_violation_for_current(message, vec![codes::VALUE_CANNOT_BE_NULL.into()]);
        }
        _ => {
            let (token, code) = match (accepts_object, accepts_array) {
                (true, true) => (
                    messages::MSG_EXPECTED_JSON_OBJECT_OR_ARRAY,
                    codes::MUST_BE_OBJECT_OR_ARRAY,
                ),
                (false, true) => (messages::MSG_EXPECTED_JSON_ARRAY, codes::MUST_BE_ARRAY),
                _ => (messages::MSG_EXPECTED_JSON_OBJECT, codes::MUST_BE_OBJECT),
            };
            let message = ctx.resolve(token, &[]);
            ctx.add_violation_for_current(message, vec![code.into()]);
        }
    }
    ctx.pop();

    trace_debug!(
        violations = ctx.violations().len(),
        stopped = !ctx.continuing(),
        "validation finished"
    );
}

// Each element gets an index frame; non-objects are reported on that frame
fn validate_elements<'a>(ctx: &mut ValidatorContext<'a>, validator: &'a Validator, items: &'a [Value]) {
    for (index, item) in items.iter().enumerate() {
        if !ctx.continuing() {
            break;
        }
        ctx.push_index(index, item);
        match item {
            Value::Object(map) => validate_object(ctx, validator, item, map),
            _ => {
                let message = ctx.resolve(messages::MSG_ARRAY_ELEMENT_MUST_BE_OBJECT, &[]);
                ctx.add_violation_for_current(
                    message,
                    vec![codes::ARRAY_ELEMENT_MUST_BE_OBJECT.into()],
                );
            }
        }
        ctx.pop();
    }
}

// The object's frame is already on top of the stack
fn validate_object<'a>(
    ctx: &mut ValidatorContext<'a>,
    validator: &'a Validator,
    value: &'a Value,
    map: &'a Map<String, Value>,
) {
    run_constraints(ctx, &validator.constraints, value, Some(validator));
    if !ctx.continuing() {
        return;
    }

    if !validator.ignore_unknown_properties && !validator.has_variable_properties() {
        for key in map.keys() {
            if !ctx.continuing() {
                return;
            }
            if !validator.properties.contains_key(key) {
                let message = ctx.resolve(messages::MSG_UNKNOWN_PROPERTY, &[]);
                ctx.add_violation_for_property(
                    key.as_str(),
                    message,
                    vec![codes::UNKNOWN_PROPERTY.into()],
                );
            }
        }
    }

    for (name, descriptor) in validator.visit_order() {
        if !ctx.continuing() {
            return;
        }
        check_property(ctx, name, descriptor, map);
    }
}

fn check_property<'a>(
    ctx: &mut ValidatorContext<'a>,
    name: &'a str,
    descriptor: &'a PropertyDescriptor,
    map: &'a Map<String, Value>,
) {
    if !descriptor
        .when_conditions
        .iter()
        .all(|token| ctx.is_condition(token))
    {
        return;
    }

    let unwanted = descriptor
        .unwanted_conditions
        .iter()
        .any(|token| ctx.is_condition(token))
        || descriptor
            .unwanted_with
            .as_ref()
            .map_or(false, |expr| ctx.evaluate(expr));

    let Some(value) = map.get(name) else {
        let required = descriptor.mandatory
            || descriptor
                .required_with
                .as_ref()
                .map_or(false, |expr| ctx.evaluate(expr));
        if required && !unwanted {
            let message = ctx.resolve(messages::MSG_MISSING_PROPERTY, &[name.to_string()]);
            ctx.add_violation_for_property(name, message, vec![codes::MISSING_PROPERTY.into()]);
        }
        return;
    };

    if unwanted {
        let message = ctx.resolve(messages::MSG_UNWANTED_PROPERTY, &[]);
        ctx.add_violation_for_property(name, message, vec![codes::UNWANTED_PROPERTY.into()]);
        return;
    }

    if !value.is_null() && is_only_active(ctx, descriptor) {
        let others = map
            .iter()
            .any(|(key, other)| key != name && !other.is_null());
        if others {
            let message = ctx.resolve(messages::MSG_ONLY_PROPERTY, &[]);
            ctx.add_violation_for_property(name, message, vec![codes::ONLY_PROPERTY.into()]);
            if !ctx.continuing() {
                return;
            }
        }
    }

    ctx.push_property(name, value);
    check_value(ctx, descriptor, value);
    ctx.pop();
}

fn is_only_active(ctx: &ValidatorContext<'_>, descriptor: &PropertyDescriptor) -> bool {
    descriptor.only
        && (descriptor.only_conditions.is_empty()
            || descriptor
                .only_conditions
                .iter()
                .any(|token| ctx.is_condition(token)))
}

// The property's frame is on top of the stack
fn check_value<'a>(ctx: &mut ValidatorContext<'a>, descriptor: &'a PropertyDescriptor, value: &'a Value) {
    if value.is_null() {
        if descriptor.not_null {
            let message = ctx.resolve(messages::MSG_VALUE_CANNOT_BE_NULL, &[]);
            ctx.add_violation_for_current(message, vec![codes::VALUE_CANNOT_BE_NULL.into()]);
        }
        return;
    }

    if !descriptor.json_type.matches(value) {
        let message = ctx.resolve(
            messages::FMT_MSG_VALUE_EXPECTED_TYPE,
            &[descriptor.json_type.to_string()],
        );
        let type_codes = descriptor
            .json_type
            .mismatch_code()
            .map(Value::from)
            .into_iter()
            .collect();
        ctx.add_violation_for_current(message, type_codes);
        return;
    }

    run_constraints(ctx, &descriptor.constraints, value, None);
    if !ctx.continuing() {
        return;
    }

    if let Some(id) = descriptor.object_validator {
        let nested = ctx.schema().validator(id);
        check_nested(ctx, nested, value);
    }
}

// Validate a value against a nested validator; the value's frame is on top
fn check_nested<'a>(ctx: &mut ValidatorContext<'a>, validator: &'a Validator, value: &'a Value) {
    trace_trace!(path = %ctx.current_path(), "entering nested validator");
    match value {
        Value::Object(map) if !validator.disallow_object => {
            validate_object(ctx, validator, value, map)
        }
        Value::Array(items) if validator.allow_array => validate_elements(ctx, validator, items),
        _ => {
            let (token, code) = match (!validator.disallow_object, validator.allow_array) {
                (true, true) => (
                    messages::MSG_PROPERTY_VALUE_MUST_BE_OBJECT_OR_ARRAY,
                    codes::MUST_BE_OBJECT_OR_ARRAY,
                ),
                (false, true) => (
                    messages::MSG_PROPERTY_VALUE_MUST_BE_ARRAY,
                    codes::PROPERTY_VALUE_MUST_BE_ARRAY,
                ),
                _ => (
                    messages::MSG_PROPERTY_VALUE_MUST_BE_OBJECT,
                    codes::PROPERTY_VALUE_MUST_BE_OBJECT,
                ),
            };
            let message = ctx.resolve(token, &[]);
            ctx.add_violation_for_current(message, vec![code.into()]);
        }
    }
}

/// Run a constraint list in order.
///
/// `owner` is set for object-level lists; variable property constraints are
/// only applied there.
fn run_constraints<'a>(
    ctx: &mut ValidatorContext<'a>,
    constraints: &'a [Constraint],
    value: &'a Value,
    owner: Option<&'a Validator>,
) {
    ctx.resume_current();
    for constraint in constraints {
        if !ctx.continuing_current() {
            break;
        }
        if let Constraint::VariableProperty(variable) = constraint {
            if let (Some(owner), Value::Object(map)) = (owner, value) {
                check_variable_properties(ctx, owner, variable, map);
                ctx.resume_current();
            }
            continue;
        }
        match constraint.check(value, ctx) {
            Outcome::Pass => {}
            Outcome::Fail(failure) => {
                ctx.add_failure(failure);
                match constraint.on_fail() {
                    OnFail::Continue => {}
                    OnFail::Stop => break,
                    OnFail::StopAll => {
                        ctx.stop();
                        break;
                    }
                }
            }
        }
    }
    ctx.resume_current();
}

fn check_variable_properties<'a>(
    ctx: &mut ValidatorContext<'a>,
    owner: &'a Validator,
    variable: &'a VariablePropertyConstraint,
    map: &'a Map<String, Value>,
) {
    for (key, item) in map {
        if !ctx.continuing() {
            return;
        }
        if owner.properties.contains_key(key) {
            continue;
        }

        ctx.push_property(key.as_str(), item);
        let name = Value::String(key.clone());
        let mut name_ok = true;
        for constraint in &variable.name_constraints {
            if let Outcome::Fail(failure) = constraint.check(&name, ctx) {
                let message = ctx.resolve(&failure.token, &failure.args);
                let mut name_codes = vec![Value::from(codes::INVALID_PROPERTY_NAME)];
                name_codes.extend(failure.code);
                ctx.add_violation_for_current(message, name_codes);
                name_ok = false;
                if constraint.on_fail() == OnFail::StopAll {
                    ctx.stop();
                }
                break;
            }
        }

        if name_ok && ctx.continuing() {
            if item.is_null() {
                if !variable.allow_null {
                    let message = ctx.resolve(messages::MSG_VALUE_CANNOT_BE_NULL, &[]);
                    ctx.add_violation_for_current(
                        message,
                        vec![codes::VALUE_CANNOT_BE_NULL.into()],
                    );
                }
            } else if let Some(id) = variable.object_validator {
                let nested = ctx.schema().validator(id);
                check_nested(ctx, nested, item);
            }
        }
        ctx.pop();
    }
}

#[cfg(test)]
mod tests {
    use crate::constraint::{Constraint, Rule, SetConditionFrom, VariablePropertyConstraint};
    use crate::context::{ConditionScope, ValidatorContext};
    use crate::expression::Expression;
    use crate::messages::codes;
    use crate::property::PropertyDescriptor;
    use crate::validator::{Schema, SchemaBuilder, Validator};
    use serde_json::{json, Value};

    fn violations(schema: &Schema, value: Value) -> Vec<(String, String, Value)> {
        match schema.validate(&value) {
            Ok(()) => Vec::new(),
            Err(err) => err
                .violations
                .into_iter()
                .map(|v| (v.path, v.property, v.codes.into_iter().next().unwrap_or(Value::Null)))
                .collect(),
        }
    }

    fn v(path: &str, property: &str, code: &str) -> (String, String, Value) {
        (path.to_string(), property.to_string(), json!(code))
    }

    #[test]
    fn unknown_properties() {
        let schema = Schema::new(Validator::new().property("a", PropertyDescriptor::string())).unwrap();
        assert_eq!(
            violations(&schema, json!({"a": "x", "b": 1})),
            vec![v("", "b", codes::UNKNOWN_PROPERTY)]
        );
        let lenient = Schema::new(
            Validator::new()
                .property("a", PropertyDescriptor::string())
                .ignore_unknown_properties(),
        )
        .unwrap();
        assert!(lenient.validate(&json!({"a": "x", "b": 1})).is_ok());
    }

    #[test]
    fn type_mismatch_skips_constraints() {
        let schema = Schema::new(
            Validator::new().property(
                "n",
                PropertyDescriptor::integer().constraint(Rule::gt(10)),
            ),
        )
        .unwrap();
        assert_eq!(
            violations(&schema, json!({"n": 1.5})),
            vec![v("", "n", codes::PROPERTY_VALUE_MUST_BE_INTEGER)]
        );
        assert_eq!(violations(&schema, json!({"n": 5})), vec![v("", "n", "greater_than")]);
        assert!(schema.validate(&json!({"n": null})).is_ok());
    }

    #[test]
    fn exponent_literals_against_integer_type() {
        let schema = Schema::new(Validator::new().property("n", PropertyDescriptor::integer())).unwrap();
        let underflow: Value = serde_json::from_str(r#"{"n": 1e-400}"#).unwrap();
        assert_eq!(
            violations(&schema, underflow),
            vec![v("", "n", codes::PROPERTY_VALUE_MUST_BE_INTEGER)]
        );
        let whole: Value = serde_json::from_str(r#"{"n": 1.5e1}"#).unwrap();
        assert!(schema.validate(&whole).is_ok());
    }

    #[test]
    fn nested_paths() {
        let mut builder = SchemaBuilder::new();
        let address = builder.add(
            Validator::new()
                .allow_array()
                .property("street", PropertyDescriptor::string().mandatory()),
        );
        let person = builder.add(
            Validator::new()
                .allow_array()
                .property("addresses", PropertyDescriptor::array().validator(address)),
        );
        let root = builder.add(
            Validator::new().property("person", PropertyDescriptor::array().validator(person)),
        );
        let schema = builder.build(root).unwrap();

        let input = json!({"person": [
            {"addresses": []},
            {"addresses": [{}, "x"]}
        ]});
        assert_eq!(
            violations(&schema, input),
            vec![
                v("person[1].addresses[0]", "street", codes::MISSING_PROPERTY),
                v("person[1].addresses", "1", codes::ARRAY_ELEMENT_MUST_BE_OBJECT),
            ]
        );
    }

    #[test]
    fn recursive_schema() {
        let mut builder = SchemaBuilder::new();
        let node = builder.reserve();
        builder
            .define(
                node,
                Validator::new()
                    .property("name", PropertyDescriptor::string().mandatory())
                    .property("child", PropertyDescriptor::object().validator(node)),
            )
            .unwrap();
        let schema = builder.build(node).unwrap();
        assert_eq!(
            violations(&schema, json!({"name": "a", "child": {"name": "b", "child": {}}})),
            vec![v("child.child", "name", codes::MISSING_PROPERTY)]
        );
    }

    #[test]
    fn stop_and_stop_all() {
        let schema = Schema::new(
            Validator::new()
                .ordered()
                .property(
                    "a",
                    PropertyDescriptor::string()
                        .order(1)
                        .constraint(Constraint::rule(Rule::min_length(5)).stop())
                        .constraint(Rule::Uppercase),
                )
                .property("b", PropertyDescriptor::string().order(2).mandatory()),
        )
        .unwrap();
        assert_eq!(
            violations(&schema, json!({"a": "ab"})),
            vec![v("", "a", "length"), v("", "b", codes::MISSING_PROPERTY)]
        );

        let schema = Schema::new(
            Validator::new()
                .ordered()
                .property(
                    "a",
                    PropertyDescriptor::string()
                        .order(1)
                        .constraint(Constraint::rule(Rule::min_length(5)).stop_all()),
                )
                .property("b", PropertyDescriptor::string().order(2).mandatory()),
        )
        .unwrap();
        assert_eq!(violations(&schema, json!({"a": "ab"})), vec![v("", "a", "length")]);
    }

    #[test]
    fn ordered_visits_by_order_then_name() {
        let schema = Schema::new(
            Validator::new()
                .ordered()
                .property("z", PropertyDescriptor::string().mandatory().order(0))
                .property("b", PropertyDescriptor::string().mandatory().order(1))
                .property("a", PropertyDescriptor::string().mandatory().order(1)),
        )
        .unwrap();
        let order: Vec<_> = violations(&schema, json!({}))
            .into_iter()
            .map(|(_, property, _)| property)
            .collect();
        assert_eq!(order, vec!["z", "a", "b"]);
    }

    #[test]
    fn unwanted_and_required_with() {
        let schema = Schema::new(
            Validator::new()
                .property("card", PropertyDescriptor::string())
                .property(
                    "cvv",
                    PropertyDescriptor::string()
                        .required_with(Expression::must_parse("card"))
                        .unwanted_with(Expression::must_parse("!card")),
                ),
        )
        .unwrap();
        assert!(schema.validate(&json!({})).is_ok());
        assert_eq!(
            violations(&schema, json!({"card": "x"})),
            vec![v("", "cvv", codes::MISSING_PROPERTY)]
        );
        assert_eq!(
            violations(&schema, json!({"cvv": "123"})),
            vec![v("", "cvv", codes::UNWANTED_PROPERTY)]
        );
        assert!(schema.validate(&json!({"card": "x", "cvv": "123"})).is_ok());
    }

    #[test]
    fn set_condition_from_parent_scope() {
        let schema = Schema::new(
            Validator::new()
                .ordered()
                .property(
                    "kind",
                    PropertyDescriptor::string().order(0).constraint(
                        SetConditionFrom::new()
                            .prefix("kind_")
                            .scope(ConditionScope::Parent),
                    ),
                )
                .property(
                    "isbn",
                    PropertyDescriptor::string()
                        .order(1)
                        .when(["kind_book"])
                        .mandatory(),
                )
                .property(
                    "artist",
                    PropertyDescriptor::string()
                        .order(1)
                        .unwanted_when(["kind_book"]),
                ),
        )
        .unwrap();
        assert_eq!(
            violations(&schema, json!({"kind": "book", "artist": "x"})),
            vec![
                v("", "artist", codes::UNWANTED_PROPERTY),
                v("", "isbn", codes::MISSING_PROPERTY),
            ]
        );
        assert!(schema.validate(&json!({"kind": "album", "artist": "x"})).is_ok());
    }

    #[test]
    fn only_property() {
        let schema = Schema::new(
            Validator::new()
                .property("id", PropertyDescriptor::string().only())
                .property("name", PropertyDescriptor::string()),
        )
        .unwrap();
        assert!(schema.validate(&json!({"id": "x", "name": null})).is_ok());
        assert_eq!(
            violations(&schema, json!({"id": "x", "name": "y"})),
            vec![v("", "id", codes::ONLY_PROPERTY)]
        );
    }

    #[test]
    fn root_shapes() {
        let object = Schema::new(Validator::new()).unwrap();
        assert_eq!(violations(&object, json!([])), vec![v("", "", codes::MUST_BE_OBJECT)]);
        assert_eq!(violations(&object, json!(null)), vec![v("", "", codes::VALUE_CANNOT_BE_NULL)]);
        assert_eq!(violations(&object, json!(1)), vec![v("", "", codes::MUST_BE_OBJECT)]);

        let array_only = Schema::new(Validator::new().allow_array().disallow_object()).unwrap();
        assert_eq!(violations(&array_only, json!({})), vec![v("", "", codes::MUST_BE_ARRAY)]);
        assert_eq!(
            violations(&array_only, json!([1])),
            vec![v("", "0", codes::ARRAY_ELEMENT_MUST_BE_OBJECT)]
        );

        let either = Schema::new(Validator::new().allow_array().allow_null()).unwrap();
        assert!(either.validate(&json!(null)).is_ok());
        assert_eq!(
            violations(&either, json!("x")),
            vec![v("", "", codes::MUST_BE_OBJECT_OR_ARRAY)]
        );
    }

    #[test]
    fn custom_constraint_sees_context() {
        let schema = Schema::new(
            Validator::new().property(
                "a",
                PropertyDescriptor::any()
                    .constraint(Constraint::custom(|_, ctx: &mut ValidatorContext<'_>| {
                        ctx.cease_further();
                        ctx.current_property() == "a"
                    }))
                    .constraint(Constraint::failing()),
            ),
        )
        .unwrap();
        assert!(schema.validate(&json!({"a": 1})).is_ok());
    }

    #[test]
    fn stop_all_on_variable_property_name() {
        let schema = Schema::new(
            Validator::new()
                .constraint(
                    VariablePropertyConstraint::new()
                        .name_constraint(Constraint::rule(Rule::one_of(["OK"])).stop_all()),
                )
                .property("a", PropertyDescriptor::string().mandatory()),
        )
        .unwrap();
        let found = violations(&schema, json!({"X1": {}, "X2": {}}));
        assert_eq!(found, vec![v("", "X1", codes::INVALID_PROPERTY_NAME)]);
    }

    #[test]
    fn object_stop_keeps_property_checks() {
        let schema = Schema::new(
            Validator::new()
                .constraint(Constraint::failing().message("first").stop())
                .constraint(Constraint::failing().message("second"))
                .property("a", PropertyDescriptor::string().mandatory()),
        )
        .unwrap();
        let err = schema.validate(&json!({})).unwrap_err();
        let messages: Vec<_> = err.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "Missing property 'a'"]);
        assert!(err.violations[1].has_code(codes::MISSING_PROPERTY));
    }

    #[test]
    fn fail_when_fires_on_raised_condition() {
        let schema = Schema::new(
            Validator::new()
                .ordered()
                .property(
                    "kind",
                    PropertyDescriptor::string()
                        .order(0)
                        .constraint(SetConditionFrom::new().scope(ConditionScope::Parent)),
                )
                .property(
                    "legacy_id",
                    PropertyDescriptor::any()
                        .order(1)
                        .constraint(Constraint::fail_when(["retired"]).message("retired kinds have no id")),
                ),
        )
        .unwrap();
        assert!(schema.validate(&json!({"kind": "active", "legacy_id": 7})).is_ok());

        let err = schema
            .validate(&json!({"kind": "retired", "legacy_id": 7}))
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations[0].property, "legacy_id");
        assert_eq!(err.violations[0].message, "retired kinds have no id");
        assert!(err.violations[0].has_code(codes::FAILING));
    }

    #[test]
    fn failing_and_fail_when() {
        let schema = Schema::new(
            Validator::new()
                .constraint(Constraint::failing().message("object failed"))
                .property("a", PropertyDescriptor::any().constraint(Constraint::fail_when(["never"]))),
        )
        .unwrap();
        let err = schema.validate(&json!({"a": 1})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.violations[0].message, "object failed");
        assert!(err.violations[0].has_code(codes::FAILING));
    }
}
