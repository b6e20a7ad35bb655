//! Per-run validation state.
//!
//! A [`ValidatorContext`] is created for one validation call and owns
//! everything that call mutates: the path stack, the condition sets, the
//! collected violations and the stop flags. It is never shared between
//! threads.

use crate::constraint::Failure;
use crate::engine::{self, RootMode};
use crate::expression::{ConditionLookup, Expression};
use crate::i18n::{DefaultResolver, MessageResolver};
use crate::validator::Schema;
use crate::violation::{ValidationError, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// One step of a path: an object property or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Property(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Where a condition is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionScope {
    /// The frame being checked (visible to it and everything below)
    #[default]
    Current,
    /// The frame holding the current one (visible to siblings)
    Parent,
    /// The root frame
    Root,
    /// The context-wide set, independent of any frame
    Global,
}

/// An entry on the path stack.
#[derive(Debug)]
pub struct Frame<'a> {
    /// `None` for the root frame
    pub segment: Option<PathSegment>,
    pub value: &'a Value,
    pub conditions: HashSet<String>,
}

/// Mutable state of a single validation run.
///
/// ```rust,ignore
/// let mut ctx = ValidatorContext::new(&schema, &value);
/// ctx.run();
/// assert_eq!(ctx.depth(), 0);
/// let result = ctx.into_result();
/// ```
pub struct ValidatorContext<'a> {
    schema: &'a Schema,
    root: &'a Value,
    frames: Vec<Frame<'a>>,
    conditions: HashSet<String>,
    violations: Vec<Violation>,
    ok: bool,
    continue_all: bool,
    continue_current: bool,
    resolver: &'a dyn MessageResolver,
    locale: Option<&'a str>,
    stop_on_first: bool,
}

impl<'a> ValidatorContext<'a> {
    /// Create a context for validating `root` against `schema`.
    pub fn new(schema: &'a Schema, root: &'a Value) -> Self {
        Self {
            schema,
            root,
            frames: Vec::new(),
            conditions: HashSet::new(),
            violations: Vec::new(),
            ok: true,
            continue_all: true,
            continue_current: true,
            resolver: &DefaultResolver,
            locale: None,
            stop_on_first: schema.root().stop_on_first,
        }
    }

    /// Use a different message resolver.
    pub fn with_resolver(mut self, resolver: &'a dyn MessageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Resolve messages for a locale.
    pub fn with_locale(mut self, locale: Option<&'a str>) -> Self {
        self.locale = locale;
        self
    }

    /// Walk the root value, honouring the root validator's shape flags.
    pub fn run(&mut self) {
        engine::run(self, RootMode::Auto);
    }

    pub(crate) fn run_as(&mut self, mode: RootMode) {
        engine::run(self, mode);
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The value being validated.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Value of the top frame (the root before the walk starts).
    pub fn current_value(&self) -> &'a Value {
        self.frames.last().map_or(self.root, |frame| frame.value)
    }

    /// Enclosing objects of the current value, from the root down.
    ///
    /// Arrays are skipped, so one level up from an array element is the
    /// object holding the array.
    pub fn ancestor_values(&self) -> Vec<&'a Value> {
        let len = self.frames.len().saturating_sub(1);
        self.frames[..len]
            .iter()
            .map(|frame| frame.value)
            .filter(|value| value.is_object())
            .collect()
    }

    /// Number of frames on the path stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push_root(&mut self, value: &'a Value) {
        self.push(None, value);
    }

    pub fn push_property(&mut self, name: impl Into<String>, value: &'a Value) {
        self.push(Some(PathSegment::Property(name.into())), value);
    }

    pub fn push_index(&mut self, index: usize, value: &'a Value) {
        self.push(Some(PathSegment::Index(index)), value);
    }

    fn push(&mut self, segment: Option<PathSegment>, value: &'a Value) {
        self.frames.push(Frame {
            segment,
            value,
            conditions: HashSet::new(),
        });
    }

    /// Remove the top frame and its conditions.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Rendered path of the current frame, e.g. `person[1].addresses[0]`.
    pub fn current_path(&self) -> String {
        render_path(&self.frames)
    }

    /// Name (or index) of the current frame; empty at the root.
    pub fn current_property(&self) -> String {
        self.frames
            .last()
            .and_then(|frame| frame.segment.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Record a violation.
    ///
    /// With `stop_on_first` the first violation also stops the run, and any
    /// later one is dropped.
    pub fn add_violation(&mut self, violation: Violation) {
        if self.stop_on_first && !self.violations.is_empty() {
            return;
        }
        self.violations.push(violation);
        self.ok = false;
        if self.stop_on_first {
            self.continue_all = false;
        }
    }

    /// Record a violation against the current frame.
    pub fn add_violation_for_current(&mut self, message: impl Into<String>, codes: Vec<Value>) {
        let len = self.frames.len().saturating_sub(1);
        let violation = Violation::new(
            self.current_property(),
            render_path(&self.frames[..len]),
            message,
        )
        .with_codes(codes);
        self.add_violation(violation);
    }

    /// Record a violation against a named property of the current object.
    pub fn add_violation_for_property(
        &mut self,
        property: impl Into<String>,
        message: impl Into<String>,
        codes: Vec<Value>,
    ) {
        let violation =
            Violation::new(property, self.current_path(), message).with_codes(codes);
        self.add_violation(violation);
    }

    /// Render a message through the context's resolver and locale.
    pub fn resolve(&self, token: &str, args: &[String]) -> String {
        self.resolver.resolve(self.locale, token, args)
    }

    pub(crate) fn add_failure(&mut self, failure: Failure) {
        let message = self.resolve(&failure.token, &failure.args);
        self.add_violation_for_current(message, failure.code.into_iter().collect());
    }

    /// Whether a condition is active globally or on any frame of the path.
    pub fn is_condition(&self, token: &str) -> bool {
        self.conditions.contains(token)
            || self
                .frames
                .iter()
                .any(|frame| frame.conditions.contains(token))
    }

    /// Raise a condition in a scope.
    ///
    /// A frame scope that does not exist (the parent of the root) is ignored.
    pub fn set_condition(&mut self, token: impl Into<String>, scope: ConditionScope) {
        let token = token.into();
        match self.scope_set(scope) {
            Some(set) => {
                set.insert(token);
            }
            None => {
                trace_debug!(token = %token, ?scope, "no frame for condition scope");
            }
        }
    }

    /// Clear a condition from a scope.
    pub fn clear_condition(&mut self, token: &str, scope: ConditionScope) {
        if let Some(set) = self.scope_set(scope) {
            set.remove(token);
        }
    }

    fn scope_set(&mut self, scope: ConditionScope) -> Option<&mut HashSet<String>> {
        let len = self.frames.len();
        let index = match scope {
            ConditionScope::Global => return Some(&mut self.conditions),
            ConditionScope::Current => len.checked_sub(1),
            ConditionScope::Parent => len.checked_sub(2),
            ConditionScope::Root => (len > 0).then_some(0),
        };
        index.map(|i| &mut self.frames[i].conditions)
    }

    /// Stop the whole run.
    pub fn stop(&mut self) {
        self.continue_all = false;
    }

    /// Skip the remaining constraints of the current list.
    pub fn cease_further(&mut self) {
        self.continue_current = false;
    }

    /// Whether the run is still going.
    pub fn continuing(&self) -> bool {
        self.continue_all
    }

    pub(crate) fn continuing_current(&self) -> bool {
        self.continue_all && self.continue_current
    }

    pub(crate) fn resume_current(&mut self) {
        self.continue_current = true;
    }

    /// Evaluate an expression relative to the current frame.
    pub fn evaluate(&self, expression: &Expression) -> bool {
        let ancestors = self.ancestor_values();
        expression.evaluate(self.current_value(), &ancestors, self)
    }

    /// Whether no violation has been recorded.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.ok {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

impl ConditionLookup for ValidatorContext<'_> {
    fn is_condition(&self, token: &str) -> bool {
        ValidatorContext::is_condition(self, token)
    }
}

impl fmt::Debug for ValidatorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorContext")
            .field("path", &self.current_path())
            .field("depth", &self.frames.len())
            .field("conditions", &self.conditions)
            .field("violations", &self.violations.len())
            .field("continue_all", &self.continue_all)
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

fn render_path(frames: &[Frame<'_>]) -> String {
    let mut path = String::new();
    for segment in frames.iter().filter_map(|frame| frame.segment.as_ref()) {
        match segment {
            PathSegment::Property(name) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(name);
            }
            PathSegment::Index(i) => {
                path.push('[');
                path.push_str(&i.to_string());
                path.push(']');
            }
        }
    }
    path
}
