//! Named units: labelled transformations and predicates.
//!
//! A unit carries a display label and an evaluation body. Its identity is the
//! constructed object: clones share identity, two units built separately are
//! distinct even when their labels are equal.

use crate::errors::{AssertError, AssertResult};
use crate::value::{Outcome, Raised, Value};
use std::any::{type_name, Any};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

pub(crate) type StepFn = dyn Fn(&Value) -> Result<Value, Raised>;

pub(crate) enum Body {
    Step(Box<StepFn>),
    Chain(Vec<Unit>),
    Identity,
}

struct UnitInner {
    label: String,
    body: Body,
}

/// A labelled transformation, possibly a chain of them.
#[derive(Clone)]
pub struct Unit(Rc<UnitInner>);

impl Unit {
    fn from_parts(label: String, body: Body) -> Self {
        Unit(Rc::new(UnitInner { label, body }))
    }

    /// A step working directly on type-erased values. Returning the input
    /// value keeps its identity, which is how a step models a receiver that
    /// mutates itself and returns itself.
    pub fn step<F>(label: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, Raised> + 'static,
    {
        Self::from_parts(label.into(), Body::Step(Box::new(body)))
    }

    /// A typed step. An input of another type is captured as a `TypeMismatch`.
    pub fn function<I, O, F>(label: impl Into<String>, f: F) -> Self
    where
        I: Any,
        O: Any + fmt::Debug,
        F: Fn(&I) -> O + 'static,
    {
        Self::step(label, move |input: &Value| {
            let typed = downcast_input::<I>(input)?;
            Ok(Value::new(f(typed)))
        })
    }

    /// A typed step that may fail; the error is captured by its type name and
    /// message.
    pub fn try_function<I, O, E, F>(label: impl Into<String>, f: F) -> Self
    where
        I: Any,
        O: Any + fmt::Debug,
        E: fmt::Display + 'static,
        F: Fn(&I) -> Result<O, E> + 'static,
    {
        Self::step(label, move |input: &Value| {
            let typed = downcast_input::<I>(input)?;
            f(typed)
                .map(Value::new)
                .map_err(|e| Raised::from_error(&e))
        })
    }

    /// Steps applied one after another, each output feeding the next input.
    pub fn chain(steps: Vec<Unit>) -> AssertResult<Self> {
        if steps.is_empty() {
            return Err(AssertError::configuration("a chain needs at least one step"));
        }
        let label = steps
            .iter()
            .map(Unit::label)
            .filter(|label| !label.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        Ok(Self::from_parts(label, Body::Chain(steps)))
    }

    /// Returns its input unchanged. Renders as the bare subject name.
    pub fn identity() -> Self {
        Self::from_parts(String::new(), Body::Identity)
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// The steps of a chain, `None` for any other unit.
    pub fn steps(&self) -> Option<&[Unit]> {
        match &self.0.body {
            Body::Chain(steps) => Some(steps),
            _ => None,
        }
    }

    pub fn is_chain(&self) -> bool {
        self.steps().is_some()
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.0.body, Body::Identity)
    }

    pub fn same_as(&self, other: &Unit) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// A two-step chain whose first step is itself a chain: the base, and
    /// the unit applied to the base's output.
    pub fn split(&self) -> Option<(&Unit, &Unit)> {
        match self.steps()? {
            [base, rest] if base.is_chain() => Some((base, rest)),
            _ => None,
        }
    }

    /// How the unit reads when applied to `subject`: `x`, `x.f()`, `x.f().g()`,
    /// or `(y=x.f()).g()` for a split chain.
    pub fn expression(&self, subject: &str) -> String {
        self.expression_with(subject, "y")
    }

    /// [`expression`](Self::expression) with the base output of a split chain
    /// named `intermediate`.
    pub fn expression_with(&self, subject: &str, intermediate: &str) -> String {
        if let Some((base, rest)) = self.split() {
            let named = format!("({}={})", intermediate, base.expression_with(subject, intermediate));
            return rest.expression_with(&named, intermediate);
        }
        if self.label().is_empty() {
            subject.to_string()
        } else {
            format!("{}.{}", subject, self.label())
        }
    }

    /// Run the body directly, outside any session. Meant for building
    /// composite units; inside an assertion go through `Session::apply`.
    pub fn call(&self, input: &Value) -> Result<Value, Raised> {
        match &self.0.body {
            Body::Step(body) => invoke(body.as_ref(), input).into_result(),
            Body::Chain(steps) => steps
                .iter()
                .try_fold(input.clone(), |current, step| step.call(&current)),
            Body::Identity => Ok(input.clone()),
        }
    }

    pub(crate) fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn body(&self) -> &Body {
        &self.0.body
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unit").field(&self.0.label).finish()
    }
}

/// Run a step body, capturing a panic as a `Raised` of kind `panic`.
pub(crate) fn invoke(body: &StepFn, input: &Value) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| body(input))) {
        Ok(result) => Outcome::from(result),
        Err(payload) => Outcome::Raised(Raised::from_panic(payload)),
    }
}

fn downcast_input<I: Any>(input: &Value) -> Result<&I, Raised> {
    input
        .downcast_ref::<I>()
        .ok_or_else(|| Raised::type_mismatch(type_name::<I>(), input.type_name()))
}

/// A unit whose output is a `bool`.
#[derive(Clone, Debug)]
pub struct Predicate(Unit);

impl Predicate {
    pub fn new<I, F>(label: impl Into<String>, f: F) -> Self
    where
        I: Any,
        F: Fn(&I) -> bool + 'static,
    {
        Predicate(Unit::function(label, f))
    }

    pub fn try_new<I, E, F>(label: impl Into<String>, f: F) -> Self
    where
        I: Any,
        E: fmt::Display + 'static,
        F: Fn(&I) -> Result<bool, E> + 'static,
    {
        Predicate(Unit::try_function(label, f))
    }

    /// Wrap a unit expected to produce a `bool`. Any other output makes the
    /// predicate fail with a `TypeMismatch`.
    pub fn from_unit(unit: Unit) -> Self {
        Predicate(unit)
    }

    pub fn label(&self) -> &str {
        self.0.label()
    }

    /// Test directly, outside any session.
    pub fn call(&self, input: &Value) -> Result<bool, Raised> {
        let value = self.0.call(input)?;
        value
            .downcast_ref::<bool>()
            .copied()
            .ok_or_else(|| Raised::type_mismatch("bool", value.type_name()))
    }

    pub fn unit(&self) -> &Unit {
        &self.0
    }
}
