//! Combinators fusing units into a single labelled unit.
//!
//! A fused unit is one step to the session: its parts are not recorded on
//! their own and do not appear in chain diagrams. Use a chain when each part
//! should be explained.

use layered_assert::{Predicate, Unit, Value};

pub trait PredicateExt {
    /// `(a&&b)`
    fn and(&self, other: &Predicate) -> Predicate;
    /// `(a||b)`
    fn or(&self, other: &Predicate) -> Predicate;
    /// `!a`
    fn negate(&self) -> Predicate;
}

impl PredicateExt for Predicate {
    fn and(&self, other: &Predicate) -> Predicate {
        let (a, b) = (self.clone(), other.clone());
        let label = format!("({}&&{})", a.label(), b.label());
        Predicate::from_unit(Unit::step(label, move |input: &Value| {
            Ok(Value::new(a.call(input)? && b.call(input)?))
        }))
    }

    fn or(&self, other: &Predicate) -> Predicate {
        let (a, b) = (self.clone(), other.clone());
        let label = format!("({}||{})", a.label(), b.label());
        Predicate::from_unit(Unit::step(label, move |input: &Value| {
            Ok(Value::new(a.call(input)? || b.call(input)?))
        }))
    }

    fn negate(&self) -> Predicate {
        let a = self.clone();
        let label = format!("!{}", a.label());
        Predicate::from_unit(Unit::step(label, move |input: &Value| {
            Ok(Value::new(!a.call(input)?))
        }))
    }
}

pub trait UnitExt {
    /// `self` then `next`, labelled `self->next`.
    fn and_then(&self, next: &Unit) -> Unit;
    /// `before` then `self`, labelled `before->self`.
    fn compose(&self, before: &Unit) -> Unit;
}

impl UnitExt for Unit {
    fn and_then(&self, next: &Unit) -> Unit {
        let (first, second) = (self.clone(), next.clone());
        let label = format!("{}->{}", first.label(), second.label());
        Unit::step(label, move |input: &Value| second.call(&first.call(input)?))
    }

    fn compose(&self, before: &Unit) -> Unit {
        before.and_then(self)
    }
}
