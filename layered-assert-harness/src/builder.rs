//! Fluent check builders.
//!
//! A builder starts from a base transform and collects predicates, each
//! becoming a leaf. A leaf added with [`AsObject::check_with`] is a split
//! chain: the shared base chain, then the check's own steps. The session runs
//! the base once for all leaves, and explanations draw it once as `y`.

use layered_assert::{AssertError, AssertResult, Check, Op, Predicate, Unit};
use layered_predicates::predicates;
use tracing::trace;

/// Checks on whatever the base transform produces.
#[derive(Debug, Clone)]
pub struct AsObject {
    base: Unit,
    checks: Vec<Check>,
}

/// Start from `base`; `Unit::identity()` checks the subject itself.
pub fn as_object(base: Unit) -> AsObject {
    AsObject {
        base: as_chain(&base),
        checks: Vec::new(),
    }
}

impl AsObject {
    /// Check the base output.
    pub fn check(mut self, predicate: Predicate) -> Self {
        self.checks.push(Check::leaf(self.base.clone(), predicate));
        self
    }

    /// Check what `step` makes of the base output.
    pub fn check_with(mut self, step: &Unit, predicate: Predicate) -> Self {
        let transform = join(&self.base, step);
        trace!(transform = transform.label(), "check added");
        self.checks.push(Check::leaf(transform, predicate));
        self
    }

    /// Every check must pass.
    pub fn all(self) -> AssertResult<Check> {
        self.finish(Op::And)
    }

    /// At least one check must pass.
    pub fn any(self) -> AssertResult<Check> {
        self.finish(Op::Or)
    }

    fn finish(mut self, op: Op) -> AssertResult<Check> {
        match self.checks.len() {
            0 => Err(AssertError::configuration(format!(
                "`{}` on `{}` has no checks",
                op.name(),
                self.base.expression("x")
            ))),
            1 => Ok(self.checks.remove(0)),
            _ => Check::composite(op, self.checks),
        }
    }
}

/// Checks on a `String` base output, with shorthands for the common string
/// predicates.
#[derive(Debug, Clone)]
pub struct AsString(AsObject);

pub fn as_string(base: Unit) -> AsString {
    AsString(as_object(base))
}

impl AsString {
    pub fn check(self, predicate: Predicate) -> Self {
        AsString(self.0.check(predicate))
    }

    pub fn check_with(self, step: &Unit, predicate: Predicate) -> Self {
        AsString(self.0.check_with(step, predicate))
    }

    pub fn equal_to(self, expected: impl Into<String>) -> Self {
        self.check(predicates::equal_to(expected.into()))
    }

    pub fn contains_string(self, needle: impl Into<String>) -> Self {
        self.check(predicates::contains_string(needle))
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.check(predicates::starts_with(prefix))
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.check(predicates::ends_with(suffix))
    }

    pub fn matches_regex(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.check(predicates::matches_regex(pattern)?))
    }

    pub fn all(self) -> AssertResult<Check> {
        self.0.all()
    }

    pub fn any(self) -> AssertResult<Check> {
        self.0.any()
    }
}

pub fn all_of(checks: Vec<Check>) -> AssertResult<Check> {
    Check::all(checks)
}

pub fn any_of(checks: Vec<Check>) -> AssertResult<Check> {
    Check::any(checks)
}

pub fn not(check: Check) -> Check {
    Check::not(check)
}

/// `base` then `step`, keeping the base as one unit.
fn join(base: &Unit, step: &Unit) -> Unit {
    let rest = as_chain(step);
    if base.is_identity() {
        return rest;
    }
    Unit::chain(vec![base.clone(), rest.clone()]).unwrap_or(rest)
}

fn as_chain(unit: &Unit) -> Unit {
    if unit.is_chain() || unit.is_identity() {
        return unit.clone();
    }
    Unit::chain(vec![unit.clone()]).unwrap_or_else(|_| unit.clone())
}
