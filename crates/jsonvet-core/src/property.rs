//! Per-property schema.

use crate::constraint::{Constraint, Rule};
use crate::expression::Expression;
use crate::json_type::JsonType;
use crate::validator::ValidatorId;

/// Describes one property of an object.
///
/// ```rust,ignore
/// let name = PropertyDescriptor::string()
///     .mandatory()
///     .not_null()
///     .constraint(Rule::length(1, 255));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub json_type: JsonType,
    /// Absence is a violation
    pub mandatory: bool,
    /// An explicit `null` is a violation
    pub not_null: bool,
    /// Visit position when the validator checks properties in order
    pub order: i32,
    pub constraints: Vec<Constraint>,
    /// Validator for object values, or arrays of objects
    pub object_validator: Option<ValidatorId>,
    /// All of these conditions must be active for the property to be checked
    pub when_conditions: Vec<String>,
    /// If any of these conditions is active the property must be absent
    pub unwanted_conditions: Vec<String>,
    /// When true the property is mandatory
    pub required_with: Option<Expression>,
    /// When true the property must be absent
    pub unwanted_with: Option<Expression>,
    /// The property must be the only non-null one in its object
    pub only: bool,
    /// Restricts `only` to when any of these conditions is active
    pub only_conditions: Vec<String>,
}

impl PropertyDescriptor {
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type,
            ..Self::default()
        }
    }

    pub fn any() -> Self {
        Self::new(JsonType::Any)
    }

    pub fn string() -> Self {
        Self::new(JsonType::String)
    }

    pub fn number() -> Self {
        Self::new(JsonType::Number)
    }

    pub fn integer() -> Self {
        Self::new(JsonType::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(JsonType::Boolean)
    }

    pub fn object() -> Self {
        Self::new(JsonType::Object)
    }

    pub fn array() -> Self {
        Self::new(JsonType::Array)
    }

    pub fn datetime() -> Self {
        Self::new(JsonType::Datetime)
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Append a constraint; constraints run in the order they were added.
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn validator(mut self, id: ValidatorId) -> Self {
        self.object_validator = Some(id);
        self
    }

    pub fn when<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.when_conditions
            .extend(conditions.into_iter().map(Into::into));
        self
    }

    pub fn unwanted_when<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unwanted_conditions
            .extend(conditions.into_iter().map(Into::into));
        self
    }

    pub fn required_with(mut self, expression: Expression) -> Self {
        self.required_with = Some(expression);
        self
    }

    pub fn unwanted_with(mut self, expression: Expression) -> Self {
        self.unwanted_with = Some(expression);
        self
    }

    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }

    /// `only`, but just while any of the conditions is active.
    pub fn only_when<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = true;
        self.only_conditions
            .extend(conditions.into_iter().map(Into::into));
        self
    }

    /// Element type declared by an `ArrayOf` rule, `Any` when there is none.
    pub fn element_type(&self) -> JsonType {
        self.constraints
            .iter()
            .find_map(|c| match c.as_rule() {
                Some(Rule::ArrayOf { of, .. }) => Some(*of),
                _ => None,
            })
            .unwrap_or(JsonType::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let d = PropertyDescriptor::string()
            .mandatory()
            .not_null()
            .order(3)
            .when(["a", "b"])
            .only_when(["c"]);
        assert_eq!(d.json_type, JsonType::String);
        assert!(d.mandatory && d.not_null && d.only);
        assert_eq!(d.order, 3);
        assert_eq!(d.when_conditions, vec!["a", "b"]);
        assert_eq!(d.only_conditions, vec!["c"]);
    }

    #[test]
    fn element_type_from_array_of() {
        assert_eq!(PropertyDescriptor::array().element_type(), JsonType::Any);
        let d = PropertyDescriptor::array()
            .constraint(Rule::NotEmpty)
            .constraint(Rule::array_of(JsonType::Integer));
        assert_eq!(d.element_type(), JsonType::Integer);
    }
}
