//! Constraints attached to properties and validators.
//!
//! [`Constraint`] is a closed set of variants. Value checks live in
//! [`Rule`]; the remaining variants control flow or mutate the
//! [`ValidatorContext`] (conditions, variable property names).

pub mod codebooks;
mod rules;

pub use rules::{Bound, Pattern, Rule};

use crate::context::{ConditionScope, ValidatorContext};
use crate::messages::{self, codes};
use crate::validator::ValidatorId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What to do after a constraint fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnFail {
    /// Keep checking the remaining constraints
    #[default]
    Continue,
    /// Skip the remaining constraints of this property (or object)
    Stop,
    /// Abort the whole validation run
    StopAll,
}

/// A failed check: the message token, its arguments and a code.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Message key or format string, resolved by the message resolver
    pub token: String,
    /// Positional arguments for the message
    pub args: Vec<String>,
    /// Machine-readable code for the violation
    pub code: Option<Value>,
}

impl Failure {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            args: Vec::new(),
            code: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_code(mut self, code: impl Into<Value>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Result of running a single constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass,
    Fail(Failure),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

/// A built-in rule with an optional message override.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConstraint {
    pub rule: Rule,
    /// Replaces the rule's default message token
    pub message: Option<String>,
    pub on_fail: OnFail,
}

/// Always fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Failing {
    pub message: Option<String>,
    pub on_fail: OnFail,
}

/// Fails when any of the listed conditions is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailWhen {
    pub conditions: Vec<String>,
    pub message: Option<String>,
    pub on_fail: OnFail,
}

/// Raises a condition from the value of the property being checked.
///
/// The value is stringified (strings, numbers and booleans only), mapped
/// through `mapping` when it has an entry, and prefixed with `prefix`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetConditionFrom {
    pub prefix: String,
    pub mapping: HashMap<String, String>,
    pub scope: ConditionScope,
}

impl SetConditionFrom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.mapping.insert(from.into(), to.into());
        self
    }

    pub fn scope(mut self, scope: ConditionScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Object-level discriminator: raises a condition on the object's frame
/// from the value of one of its properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetConditionProperty {
    pub property_name: String,
    pub prefix: String,
    pub mapping: HashMap<String, String>,
}

impl SetConditionProperty {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.mapping.insert(from.into(), to.into());
        self
    }
}

/// Object-level constraint for objects whose keys are data.
///
/// Applies to every key without a property descriptor: the key is checked
/// against `name_constraints`, and the value must be a non-null object
/// (unless `allow_null`) valid against `object_validator`.
#[derive(Debug, Clone, Default)]
pub struct VariablePropertyConstraint {
    pub name_constraints: Vec<Constraint>,
    pub object_validator: Option<ValidatorId>,
    pub allow_null: bool,
}

impl VariablePropertyConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.name_constraints.push(constraint.into());
        self
    }

    pub fn validator(mut self, id: ValidatorId) -> Self {
        self.object_validator = Some(id);
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }
}

/// Signature of a user-supplied check.
pub type CustomCheck = dyn Fn(&Value, &mut ValidatorContext<'_>) -> bool + Send + Sync;

/// A user-supplied check.
#[derive(Clone)]
pub struct CustomConstraint {
    pub check: Arc<CustomCheck>,
    pub message: Option<String>,
    pub code: Option<Value>,
    pub on_fail: OnFail,
}

impl CustomConstraint {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value, &mut ValidatorContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            message: None,
            code: None,
            on_fail: OnFail::Continue,
        }
    }

    pub fn code(mut self, code: impl Into<Value>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Debug for CustomConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomConstraint")
            .field("message", &self.message)
            .field("code", &self.code)
            .field("on_fail", &self.on_fail)
            .finish_non_exhaustive()
    }
}

/// A constraint on a property value or on a whole object.
#[derive(Debug, Clone)]
pub enum Constraint {
    Rule(RuleConstraint),
    Failing(Failing),
    FailWhen(FailWhen),
    SetConditionFrom(SetConditionFrom),
    SetConditionProperty(SetConditionProperty),
    VariableProperty(VariablePropertyConstraint),
    Custom(CustomConstraint),
}

impl Constraint {
    /// A built-in rule with the default message.
    pub fn rule(rule: Rule) -> Self {
        Constraint::Rule(RuleConstraint {
            rule,
            message: None,
            on_fail: OnFail::Continue,
        })
    }

    pub fn failing() -> Self {
        Constraint::Failing(Failing::default())
    }

    pub fn fail_when<I, S>(conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::FailWhen(FailWhen {
            conditions: conditions.into_iter().map(Into::into).collect(),
            ..FailWhen::default()
        })
    }

    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Value, &mut ValidatorContext<'_>) -> bool + Send + Sync + 'static,
    {
        Constraint::Custom(CustomConstraint::new(check))
    }

    /// Override the failure message token. Ignored by marker constraints.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        match &mut self {
            Constraint::Rule(c) => c.message = message,
            Constraint::Failing(c) => c.message = message,
            Constraint::FailWhen(c) => c.message = message,
            Constraint::Custom(c) => c.message = message,
            Constraint::SetConditionFrom(_)
            | Constraint::SetConditionProperty(_)
            | Constraint::VariableProperty(_) => {}
        }
        self
    }

    /// Skip the remaining constraints of the property when this one fails.
    pub fn stop(self) -> Self {
        self.with_on_fail(OnFail::Stop)
    }

    /// Abort the whole run when this one fails.
    pub fn stop_all(self) -> Self {
        self.with_on_fail(OnFail::StopAll)
    }

    fn with_on_fail(mut self, on_fail: OnFail) -> Self {
        match &mut self {
            Constraint::Rule(c) => c.on_fail = on_fail,
            Constraint::Failing(c) => c.on_fail = on_fail,
            Constraint::FailWhen(c) => c.on_fail = on_fail,
            Constraint::Custom(c) => c.on_fail = on_fail,
            Constraint::SetConditionFrom(_)
            | Constraint::SetConditionProperty(_)
            | Constraint::VariableProperty(_) => {}
        }
        self
    }

    /// Iteration control applied when the constraint fails.
    pub fn on_fail(&self) -> OnFail {
        match self {
            Constraint::Rule(c) => c.on_fail,
            Constraint::Failing(c) => c.on_fail,
            Constraint::FailWhen(c) => c.on_fail,
            Constraint::Custom(c) => c.on_fail,
            _ => OnFail::Continue,
        }
    }

    /// The rule, when this is a rule constraint.
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Constraint::Rule(c) => Some(&c.rule),
            _ => None,
        }
    }

    /// Run the constraint against a value.
    ///
    /// Variable property constraints need the schema walk and are applied by
    /// the engine; here they always pass.
    pub fn check(&self, value: &Value, ctx: &mut ValidatorContext<'_>) -> Outcome {
        match self {
            Constraint::Rule(c) => match c.rule.check(value) {
                Ok(()) => Outcome::Pass,
                Err(failure) => Outcome::Fail(override_token(failure, &c.message)),
            },
            Constraint::Failing(c) => Outcome::Fail(
                Failure::new(token_or(&c.message, messages::MSG_FAILING)).with_code(codes::FAILING),
            ),
            Constraint::FailWhen(c) => {
                if c.conditions.iter().any(|token| ctx.is_condition(token)) {
                    Outcome::Fail(
                        Failure::new(token_or(&c.message, messages::MSG_FAILING))
                            .with_code(codes::FAILING),
                    )
                } else {
                    Outcome::Pass
                }
            }
            Constraint::SetConditionFrom(c) => {
                if let Some(token) = condition_token(value, &c.prefix, &c.mapping) {
                    ctx.set_condition(token, c.scope);
                }
                Outcome::Pass
            }
            Constraint::SetConditionProperty(c) => {
                let token = value
                    .get(&c.property_name)
                    .and_then(|v| condition_token(v, &c.prefix, &c.mapping));
                if let Some(token) = token {
                    ctx.set_condition(token, ConditionScope::Current);
                }
                Outcome::Pass
            }
            Constraint::VariableProperty(_) => Outcome::Pass,
            Constraint::Custom(c) => {
                if (c.check)(value, ctx) {
                    Outcome::Pass
                } else {
                    let failure = Failure::new(token_or(&c.message, messages::MSG_CUSTOM));
                    Outcome::Fail(failure.with_code(c.code.clone().unwrap_or(codes::CUSTOM.into())))
                }
            }
        }
    }
}

impl From<Rule> for Constraint {
    fn from(rule: Rule) -> Self {
        Constraint::rule(rule)
    }
}

impl From<RuleConstraint> for Constraint {
    fn from(c: RuleConstraint) -> Self {
        Constraint::Rule(c)
    }
}

impl From<SetConditionFrom> for Constraint {
    fn from(c: SetConditionFrom) -> Self {
        Constraint::SetConditionFrom(c)
    }
}

impl From<SetConditionProperty> for Constraint {
    fn from(c: SetConditionProperty) -> Self {
        Constraint::SetConditionProperty(c)
    }
}

impl From<VariablePropertyConstraint> for Constraint {
    fn from(c: VariablePropertyConstraint) -> Self {
        Constraint::VariableProperty(c)
    }
}

impl From<CustomConstraint> for Constraint {
    fn from(c: CustomConstraint) -> Self {
        Constraint::Custom(c)
    }
}

fn token_or(message: &Option<String>, default: &str) -> String {
    message.clone().unwrap_or_else(|| default.to_string())
}

fn override_token(mut failure: Failure, message: &Option<String>) -> Failure {
    if let Some(message) = message {
        failure.token = message.clone();
    }
    failure
}

fn condition_token(value: &Value, prefix: &str, mapping: &HashMap<String, String>) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let mapped = mapping.get(&raw).cloned().unwrap_or(raw);
    let token = format!("{prefix}{mapped}");
    (!token.is_empty()).then_some(token)
}
