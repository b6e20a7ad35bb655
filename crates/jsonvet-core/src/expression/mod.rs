//! Conditional expressions over property presence and condition tokens.
//!
//! ## Grammar
//!
//! ```text
//! expr       := term { op term }
//! op         := "&&" | "||" | "^^"
//! term       := [ "!" ] atom
//! atom       := identifier | quoted | "(" expr ")"
//! ```
//!
//! - `~token` is true when the condition `token` is active.
//! - `foo` is true when property `foo` of the current object exists and is not null.
//! - `foo.bar` descends into child objects, `.foo` starts one level up,
//!   `..foo` two levels up, and `/.foo` starts at the root.
//! - A literal dot (or any other special character) in a name is escaped
//!   with a backslash (`foo\.bar`), or the name is quoted (`'foo.bar'`).
//!
//! ## Operator precedence
//!
//! There is none. Terms are folded strictly left to right, so
//! `a && b || c && !d` means `(((a && b) || c) && !d)`, and
//! `a ^^ b ^^ c` means `(a ^^ b) ^^ c` (true when an odd number of terms
//! are true). Use parentheses whenever another grouping is intended.
//!
//! ## Example
//!
//! ```rust
//! use jsonvet_core::expression::Expression;
//! use serde_json::json;
//! use std::collections::HashSet;
//!
//! let expr = Expression::must_parse("foo && !(bar || ~strict)");
//! let conditions: HashSet<String> = HashSet::new();
//!
//! assert!(expr.evaluate(&json!({"foo": 1}), &[], &conditions));
//! assert!(!expr.evaluate(&json!({"foo": 1, "bar": 2}), &[], &conditions));
//! ```

mod parser;

pub use parser::ParseError;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Source of active condition tokens.
pub trait ConditionLookup {
    /// Whether the condition token is currently active.
    fn is_condition(&self, token: &str) -> bool;
}

impl ConditionLookup for HashSet<String> {
    fn is_condition(&self, token: &str) -> bool {
        self.contains(token)
    }
}

impl ConditionLookup for BTreeSet<String> {
    fn is_condition(&self, token: &str) -> bool {
        self.contains(token)
    }
}

/// Binary operator joining a term to everything before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Operator {
    #[default]
    And,
    Or,
    Xor,
}

impl Operator {
    /// Source symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Xor => "^^",
        }
    }

    /// Apply the operator.
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            Operator::And => left && right,
            Operator::Or => left || right,
            Operator::Xor => left ^ right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Where a property path starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The object holding the property being checked
    #[default]
    Current,
    /// That many levels above the current object (always at least 1)
    Up(usize),
    /// The root value
    Root,
}

/// A reference to a (possibly nested) property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    pub anchor: Anchor,
    /// Property names to descend through; empty only for `Up` and `Root`
    pub names: Vec<String>,
}

impl PropertyPath {
    /// Resolve the referenced value.
    ///
    /// `ancestors` are ordered from the root down to the parent of `current`.
    pub fn resolve<'v>(&self, current: &'v Value, ancestors: &[&'v Value]) -> Option<&'v Value> {
        let start = match self.anchor {
            Anchor::Current => current,
            Anchor::Up(levels) => {
                if levels == 0 || levels > ancestors.len() {
                    return None;
                }
                ancestors[ancestors.len() - levels]
            }
            Anchor::Root => ancestors.first().copied().unwrap_or(current),
        };
        self.names
            .iter()
            .try_fold(start, |value, name| value.as_object()?.get(name))
    }
}

/// What a property term tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// An active condition token (`~token`)
    Condition(String),
    /// Presence of a non-null property
    Property(PropertyPath),
}

/// A single property or condition term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtherProperty {
    pub op: Operator,
    pub not: bool,
    pub reference: Reference,
}

impl OtherProperty {
    /// A property of the current object, taken literally (dots are part of the name).
    pub fn named(name: impl Into<String>) -> Self {
        Self::path(Anchor::Current, [name.into()])
    }

    /// A condition token.
    pub fn condition(token: impl Into<String>) -> Self {
        Self::from_reference(Reference::Condition(token.into()))
    }

    /// A nested property path starting `levels` objects above the current one.
    pub fn up<I, S>(levels: usize, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::path(Anchor::Up(levels), names)
    }

    /// A nested property path starting at the root.
    pub fn root<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::path(Anchor::Root, names)
    }

    /// A nested property path with an explicit anchor.
    ///
    /// `Up(0)` is the current object. With no names, an `Up` or `Root` path
    /// tests the anchor object itself, while an empty current-level path
    /// names the property `''`.
    pub fn path<I, S>(anchor: Anchor, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let anchor = match anchor {
            Anchor::Up(0) => Anchor::Current,
            other => other,
        };
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if anchor == Anchor::Current && names.is_empty() {
            names.push(String::new());
        }
        Self::from_reference(Reference::Property(PropertyPath { anchor, names }))
    }

    fn from_reference(reference: Reference) -> Self {
        Self {
            op: Operator::And,
            not: false,
            reference,
        }
    }

    /// Negate the term.
    pub fn not(mut self) -> Self {
        self.not = !self.not;
        self
    }

    fn evaluate(&self, current: &Value, ancestors: &[&Value], conditions: &dyn ConditionLookup) -> bool {
        let result = match &self.reference {
            Reference::Condition(token) => conditions.is_condition(token),
            Reference::Property(path) => path
                .resolve(current, ancestors)
                .map_or(false, |v| !v.is_null()),
        };
        result != self.not
    }
}

/// A parenthesised sub-expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtherGrouping {
    pub op: Operator,
    pub not: bool,
    pub expression: Expression,
}

impl OtherGrouping {
    /// Wrap an expression as a single term.
    pub fn new(expression: Expression) -> Self {
        Self {
            op: Operator::And,
            not: false,
            expression,
        }
    }

    /// Negate the group.
    pub fn not(mut self) -> Self {
        self.not = !self.not;
        self
    }
}

/// One term of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Property(OtherProperty),
    Grouping(OtherGrouping),
}

impl Term {
    /// Operator joining this term to the preceding ones.
    pub fn op(&self) -> Operator {
        match self {
            Term::Property(p) => p.op,
            Term::Grouping(g) => g.op,
        }
    }

    /// Whether the term is negated.
    pub fn is_negated(&self) -> bool {
        match self {
            Term::Property(p) => p.not,
            Term::Grouping(g) => g.not,
        }
    }

    fn set_op(&mut self, op: Operator) {
        match self {
            Term::Property(p) => p.op = op,
            Term::Grouping(g) => g.op = op,
        }
    }

    fn negate(&mut self) {
        match self {
            Term::Property(p) => p.not = !p.not,
            Term::Grouping(g) => g.not = !g.not,
        }
    }

    fn evaluate(&self, current: &Value, ancestors: &[&Value], conditions: &dyn ConditionLookup) -> bool {
        match self {
            Term::Property(p) => p.evaluate(current, ancestors, conditions),
            Term::Grouping(g) => g.expression.evaluate(current, ancestors, conditions) != g.not,
        }
    }
}

impl From<OtherProperty> for Term {
    fn from(p: OtherProperty) -> Self {
        Term::Property(p)
    }
}

impl From<OtherGrouping> for Term {
    fn from(g: OtherGrouping) -> Self {
        Term::Grouping(g)
    }
}

impl From<Expression> for Term {
    fn from(e: Expression) -> Self {
        Term::Grouping(OtherGrouping::new(e))
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::Property(OtherProperty::named(name))
    }
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        Term::Property(OtherProperty::named(name))
    }
}

/// A compiled boolean expression.
///
/// Build one fluently or parse it from text:
///
/// ```rust
/// use jsonvet_core::expression::{Expression, OtherProperty};
///
/// let built = Expression::new()
///     .and("foo")
///     .or_not(OtherProperty::condition("strict"))
///     .and(Expression::new().and(OtherProperty::up(1, ["bar"])).xor("baz"));
///
/// assert_eq!(built.to_string(), "foo || !~strict && (.bar ^^ baz)");
/// assert_eq!(Expression::must_parse(&built.to_string()), built);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    /// Create an empty expression (evaluates to true).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an expression.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parser::parse(input)
    }

    /// Parse an expression, panicking on error.
    ///
    /// Intended for schema construction with literal expressions.
    ///
    /// # Panics
    ///
    /// Panics if the input is not a valid expression.
    pub fn must_parse(input: &str) -> Self {
        match Self::parse(input) {
            Ok(expr) => expr,
            Err(err) => panic!("invalid expression {:?}: {}", input, err),
        }
    }

    /// Append a term joined by `op`. The first term's operator is always `And`.
    pub fn push(mut self, op: Operator, term: impl Into<Term>) -> Self {
        self.push_term(op, term.into());
        self
    }

    pub(crate) fn push_term(&mut self, op: Operator, mut term: Term) {
        term.set_op(if self.terms.is_empty() { Operator::And } else { op });
        self.terms.push(term);
    }

    pub fn and(self, term: impl Into<Term>) -> Self {
        self.push(Operator::And, term)
    }

    pub fn or(self, term: impl Into<Term>) -> Self {
        self.push(Operator::Or, term)
    }

    pub fn xor(self, term: impl Into<Term>) -> Self {
        self.push(Operator::Xor, term)
    }

    pub fn and_not(self, term: impl Into<Term>) -> Self {
        self.push(Operator::And, negated(term))
    }

    pub fn or_not(self, term: impl Into<Term>) -> Self {
        self.push(Operator::Or, negated(term))
    }

    pub fn xor_not(self, term: impl Into<Term>) -> Self {
        self.push(Operator::Xor, negated(term))
    }

    /// The terms, in evaluation order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of top-level terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a value.
    ///
    /// `current` is the object relative references start from; `ancestors`
    /// holds the enclosing values ordered from the root down to the parent of
    /// `current`.
    pub fn evaluate(
        &self,
        current: &Value,
        ancestors: &[&Value],
        conditions: &dyn ConditionLookup,
    ) -> bool {
        let mut terms = self.terms.iter();
        let Some(first) = terms.next() else {
            return true;
        };
        let initial = first.evaluate(current, ancestors, conditions);
        terms.fold(initial, |acc, term| {
            term.op()
                .apply(acc, term.evaluate(current, ancestors, conditions))
        })
    }
}

fn negated(term: impl Into<Term>) -> Term {
    let mut term = term.into();
    term.negate();
    term
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", term.op())?;
            }
            if term.is_negated() {
                f.write_str("!")?;
            }
            match term {
                Term::Property(p) => write_reference(f, &p.reference)?,
                Term::Grouping(g) => write!(f, "({})", g.expression)?,
            }
        }
        Ok(())
    }
}

fn write_reference(f: &mut fmt::Formatter<'_>, reference: &Reference) -> fmt::Result {
    match reference {
        Reference::Condition(token) => {
            f.write_str("~")?;
            write_escaped(f, token)
        }
        Reference::Property(path) => {
            match path.anchor {
                Anchor::Current => {}
                Anchor::Up(levels) => {
                    for _ in 0..levels {
                        f.write_str(".")?;
                    }
                }
                Anchor::Root => f.write_str("/.")?,
            }
            for (i, name) in path.names.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                write_escaped(f, name)?;
            }
            Ok(())
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if name.is_empty() {
        return f.write_str("''");
    }
    for (i, c) in name.chars().enumerate() {
        if parser::needs_escape(c, i == 0) {
            write!(f, "\\{}", c)?;
        } else {
            write!(f, "{}", c)?;
        }
    }
    Ok(())
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Expression::parse(&text).map_err(de::Error::custom)
    }
}
