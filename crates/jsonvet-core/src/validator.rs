//! Validators and the schema arena that holds them.
//!
//! Validators reference each other by [`ValidatorId`], so recursive shapes
//! need no back-pointers:
//!
//! ```rust
//! use jsonvet_core::{PropertyDescriptor, SchemaBuilder, Validator};
//! use serde_json::json;
//!
//! let mut builder = SchemaBuilder::new();
//! let node = builder.reserve();
//! builder
//!     .define(
//!         node,
//!         Validator::new()
//!             .property("name", PropertyDescriptor::string().mandatory())
//!             .property("child", PropertyDescriptor::object().validator(node)),
//!     )
//!     .unwrap();
//! let schema = builder.build(node).unwrap();
//!
//! let err = schema
//!     .validate(&json!({"name": "a", "child": {"child": {"name": "c"}}}))
//!     .unwrap_err();
//! assert_eq!(err.violations[0].full_path(), "child.name");
//! ```

use crate::constraint::Constraint;
use crate::context::ValidatorContext;
use crate::engine::RootMode;
use crate::error::SchemaError;
use crate::property::PropertyDescriptor;
use crate::runtime::Runtime;
use crate::violation::ValidationError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Index of a validator inside a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidatorId(usize);

impl ValidatorId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Schema for an object (or an array of objects).
#[derive(Debug, Clone, Default)]
pub struct Validator {
    pub properties: BTreeMap<String, PropertyDescriptor>,
    /// Object-level constraints, run before the properties are visited
    pub constraints: Vec<Constraint>,
    pub ignore_unknown_properties: bool,
    /// Accept an array of objects where an object is expected
    pub allow_array: bool,
    /// Reject plain objects (requires `allow_array`)
    pub disallow_object: bool,
    pub allow_null: bool,
    /// Decode numbers losslessly
    pub use_number: bool,
    /// End the run at the first violation
    pub stop_on_first: bool,
    /// Visit properties by ascending `order`, then name
    pub ordered_property_checks: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        self.properties.insert(name.into(), descriptor);
        self
    }

    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn ignore_unknown_properties(mut self) -> Self {
        self.ignore_unknown_properties = true;
        self
    }

    pub fn allow_array(mut self) -> Self {
        self.allow_array = true;
        self
    }

    pub fn disallow_object(mut self) -> Self {
        self.disallow_object = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn use_number(mut self) -> Self {
        self.use_number = true;
        self
    }

    pub fn stop_on_first(mut self) -> Self {
        self.stop_on_first = true;
        self
    }

    pub fn ordered(mut self) -> Self {
        self.ordered_property_checks = true;
        self
    }

    /// A validator must accept objects, arrays, or both.
    pub fn is_well_formed(&self) -> bool {
        self.allow_array || !self.disallow_object
    }

    pub(crate) fn has_variable_properties(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, Constraint::VariableProperty(_)))
    }

    /// Properties in visit order.
    ///
    /// Without `ordered_property_checks` the order is an implementation
    /// detail; schemas that rely on conditions raised by sibling properties
    /// must enable ordering.
    pub fn visit_order(&self) -> Vec<(&str, &PropertyDescriptor)> {
        let mut properties: Vec<_> = self
            .properties
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
            .collect();
        if self.ordered_property_checks {
            properties.sort_by(|(a_name, a), (b_name, b)| {
                a.order.cmp(&b.order).then_with(|| a_name.cmp(b_name))
            });
        }
        properties
    }

    // First constraint list, other than the object's own, holding a variable
    // property constraint
    fn misplaced_variable_property(&self) -> Option<String> {
        let is_variable = |c: &Constraint| matches!(c, Constraint::VariableProperty(_));
        for (name, descriptor) in &self.properties {
            if descriptor.constraints.iter().any(is_variable) {
                return Some(format!("property '{}'", name));
            }
        }
        self.constraints.iter().find_map(|c| match c {
            Constraint::VariableProperty(variable)
                if variable.name_constraints.iter().any(is_variable) =>
            {
                Some("a variable property name".to_string())
            }
            _ => None,
        })
    }

    // Every validator id referenced directly by this validator
    fn references(&self) -> Vec<(ValidatorId, String)> {
        let mut refs = Vec::new();
        for (name, descriptor) in &self.properties {
            if let Some(id) = descriptor.object_validator {
                refs.push((id, format!("property '{}'", name)));
            }
        }
        for constraint in &self.constraints {
            if let Constraint::VariableProperty(variable) = constraint {
                if let Some(id) = variable.object_validator {
                    refs.push((id, "variable property constraint".to_string()));
                }
            }
        }
        refs
    }
}

/// Collects validators and hands out their ids.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    slots: Vec<Option<Validator>>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator.
    pub fn add(&mut self, validator: Validator) -> ValidatorId {
        self.slots.push(Some(validator));
        ValidatorId(self.slots.len() - 1)
    }

    /// Reserve an id to be defined later, for self-referencing validators.
    pub fn reserve(&mut self) -> ValidatorId {
        self.slots.push(None);
        ValidatorId(self.slots.len() - 1)
    }

    /// Define (or replace) the validator behind an id.
    pub fn define(&mut self, id: ValidatorId, validator: Validator) -> Result<(), SchemaError> {
        let slot = self
            .slots
            .get_mut(id.0)
            .ok_or_else(|| SchemaError::UnknownValidator {
                referenced: id.0,
                location: "define".to_string(),
            })?;
        *slot = Some(validator);
        Ok(())
    }

    /// Check every validator and freeze the schema.
    pub fn build(self, root: ValidatorId) -> Result<Schema, SchemaError> {
        let count = self.slots.len();
        if root.0 >= count {
            return Err(SchemaError::UnknownValidator {
                referenced: root.0,
                location: "schema root".to_string(),
            });
        }

        let mut validators = Vec::with_capacity(count);
        for (index, slot) in self.slots.into_iter().enumerate() {
            let validator = slot.ok_or(SchemaError::UndefinedValidator(index))?;
            if !validator.is_well_formed() {
                return Err(SchemaError::IllFormedValidator(index));
            }
            if let Some(location) = validator.misplaced_variable_property() {
                return Err(SchemaError::MisplacedVariableProperty {
                    validator: index,
                    location,
                });
            }
            for (id, location) in validator.references() {
                if id.0 >= count {
                    return Err(SchemaError::UnknownValidator {
                        referenced: id.0,
                        location: format!("validator {} {}", index, location),
                    });
                }
            }
            validators.push(validator);
        }

        trace_debug!(validators = validators.len(), "schema built");
        Ok(Schema { validators, root })
    }
}

/// An immutable, checked set of validators with a root.
///
/// Schemas are `Send + Sync` and can be shared between threads; each
/// validation call owns its own [`ValidatorContext`].
#[derive(Debug, Clone)]
pub struct Schema {
    validators: Vec<Validator>,
    root: ValidatorId,
}

impl Schema {
    /// A schema made of a single validator.
    pub fn new(validator: Validator) -> Result<Self, SchemaError> {
        let mut builder = SchemaBuilder::new();
        let root = builder.add(validator);
        builder.build(root)
    }

    pub fn root_id(&self) -> ValidatorId {
        self.root
    }

    pub fn root(&self) -> &Validator {
        &self.validators[self.root.0]
    }

    pub fn get(&self, id: ValidatorId) -> Option<&Validator> {
        self.validators.get(id.0)
    }

    // Ids are checked by `SchemaBuilder::build`
    pub(crate) fn validator(&self, id: ValidatorId) -> &Validator {
        &self.validators[id.0]
    }

    /// Validate a value with the default runtime.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_with(value, &Runtime::default(), None)
    }

    /// Validate a value that must be an object.
    pub fn validate_object(&self, value: &Value) -> Result<(), ValidationError> {
        self.run(value, &Runtime::default(), None, RootMode::Object)
    }

    /// Validate a value that must be an array; each element as an object.
    pub fn validate_array(&self, value: &Value) -> Result<(), ValidationError> {
        self.run(value, &Runtime::default(), None, RootMode::Array)
    }

    /// Validate with an explicit runtime and locale.
    pub fn validate_with(
        &self,
        value: &Value,
        runtime: &Runtime,
        locale: Option<&str>,
    ) -> Result<(), ValidationError> {
        self.run(value, runtime, locale, RootMode::Auto)
    }

    fn run(
        &self,
        value: &Value,
        runtime: &Runtime,
        locale: Option<&str>,
        mode: RootMode,
    ) -> Result<(), ValidationError> {
        let locale = locale.or(runtime.default_locale());
        let mut ctx = ValidatorContext::new(self, value)
            .with_resolver(runtime.resolver())
            .with_locale(locale);
        ctx.run_as(mode);
        ctx.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::VariablePropertyConstraint;
    use serde_json::json;

    #[test]
    fn ill_formed_validator_is_rejected() {
        let err = Schema::new(Validator::new().disallow_object()).unwrap_err();
        assert_eq!(err, SchemaError::IllFormedValidator(0));
        assert!(Schema::new(Validator::new().disallow_object().allow_array()).is_ok());
    }

    #[test]
    fn dangling_references_are_rejected() {
        let mut builder = SchemaBuilder::new();
        let reserved = builder.reserve();
        let root = builder.add(Validator::new().property("a", PropertyDescriptor::object().validator(reserved)));
        assert_eq!(builder.build(root).unwrap_err(), SchemaError::UndefinedValidator(0));

        let mut other = SchemaBuilder::new();
        let far = {
            let mut scratch = SchemaBuilder::new();
            scratch.add(Validator::new());
            scratch.add(Validator::new())
        };
        let root = other.add(
            Validator::new().constraint(VariablePropertyConstraint::new().validator(far)),
        );
        assert!(matches!(
            other.build(root),
            Err(SchemaError::UnknownValidator { referenced: 1, .. })
        ));
    }

    #[test]
    fn variable_properties_only_on_objects() {
        let err = Schema::new(Validator::new().property(
            "tags",
            PropertyDescriptor::object().constraint(VariablePropertyConstraint::new()),
        ))
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MisplacedVariableProperty {
                validator: 0,
                location: "property 'tags'".to_string(),
            }
        );

        let nested = VariablePropertyConstraint::new()
            .name_constraint(VariablePropertyConstraint::new());
        assert!(matches!(
            Schema::new(Validator::new().constraint(nested)),
            Err(SchemaError::MisplacedVariableProperty { validator: 0, .. })
        ));

        assert!(Schema::new(Validator::new().constraint(VariablePropertyConstraint::new())).is_ok());
    }

    #[test]
    fn unknown_root_is_rejected() {
        let builder = SchemaBuilder::new();
        assert!(matches!(
            builder.build(ValidatorId(3)),
            Err(SchemaError::UnknownValidator { referenced: 3, .. })
        ));
    }

    #[test]
    fn array_and_object_entry_points() {
        let schema = Schema::new(
            Validator::new().property("id", PropertyDescriptor::integer().mandatory()),
        )
        .unwrap();
        assert!(schema.validate_array(&json!([{"id": 1}, {"id": 2}])).is_ok());
        let err = schema.validate_array(&json!([{"id": 1}, {}])).unwrap_err();
        assert_eq!(err.violations[0].path, "[1]");
        assert!(schema.validate_array(&json!({"id": 1})).is_err());
        assert!(schema.validate_object(&json!({"id": 1})).is_ok());
        assert!(schema.validate(&json!([{"id": 1}])).is_err());
    }

    #[test]
    fn schemas_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
