//! Predicates.
//!
//! A predicate built for one input type tests `false` against any other type,
//! and the explanation reports the `TypeMismatch`. String predicates take
//! `String` inputs.

use crate::labelled;
use layered_assert::{Predicate, Raised, Unit, Value};
use regex::Regex;
use std::any::Any;
use std::fmt::Debug;

pub fn always_true() -> Predicate {
    Predicate::from_unit(Unit::step("always_true", |_: &Value| Ok(Value::new(true))))
}

pub fn is_true() -> Predicate {
    Predicate::new("is_true", |b: &bool| *b)
}

pub fn is_false() -> Predicate {
    Predicate::new("is_false", |b: &bool| !*b)
}

pub fn is_none<T: Any>() -> Predicate {
    Predicate::new("is_none", |o: &Option<T>| o.is_none())
}

pub fn is_some<T: Any>() -> Predicate {
    Predicate::new("is_some", |o: &Option<T>| o.is_some())
}

pub fn equal_to<T>(expected: T) -> Predicate
where
    T: Any + PartialEq + Debug + Clone,
{
    Predicate::new(labelled("equal_to", &expected), move |v: &T| *v == expected)
}

/// Passes only for the very value given, not an equal one.
pub fn is_same_as(expected: Value) -> Predicate {
    let label = format!("is_same_as[{}]", layered_assert::format_value(&expected));
    Predicate::from_unit(Unit::step(label, move |input: &Value| {
        Ok(Value::new(input.same_as(&expected)))
    }))
}

pub fn gt<T>(bound: T) -> Predicate
where
    T: Any + PartialOrd + Debug + Clone,
{
    Predicate::new(labelled(">", &bound), move |v: &T| *v > bound)
}

pub fn ge<T>(bound: T) -> Predicate
where
    T: Any + PartialOrd + Debug + Clone,
{
    Predicate::new(labelled(">=", &bound), move |v: &T| *v >= bound)
}

pub fn lt<T>(bound: T) -> Predicate
where
    T: Any + PartialOrd + Debug + Clone,
{
    Predicate::new(labelled("<", &bound), move |v: &T| *v < bound)
}

pub fn le<T>(bound: T) -> Predicate
where
    T: Any + PartialOrd + Debug + Clone,
{
    Predicate::new(labelled("<=", &bound), move |v: &T| *v <= bound)
}

/// Equal by ordering. Unlike [`equal_to`], incomparable values (NaN) make
/// the predicate fail with `Incomparable` instead of testing `false`.
pub fn eq<T>(other: T) -> Predicate
where
    T: Any + PartialOrd + Debug + Clone,
{
    let label = labelled("=", &other);
    Predicate::try_new(label, move |v: &T| match v.partial_cmp(&other) {
        Some(ordering) => Ok(ordering.is_eq()),
        None => Err(Raised::new(
            "Incomparable",
            format!("{:?} and {:?} have no ordering", v, other),
        )),
    })
}

/// The whole string must match `pattern`.
pub fn matches_regex(pattern: &str) -> Result<Predicate, regex::Error> {
    let regex = Regex::new(&format!("^(?:{})$", pattern))?;
    Ok(Predicate::new(
        labelled("matches_regex", &pattern.to_string()),
        move |s: &String| regex.is_match(s),
    ))
}

pub fn contains_string(needle: impl Into<String>) -> Predicate {
    let needle = needle.into();
    Predicate::new(labelled("contains_string", &needle), move |s: &String| {
        s.contains(needle.as_str())
    })
}

pub fn starts_with(prefix: impl Into<String>) -> Predicate {
    let prefix = prefix.into();
    Predicate::new(labelled("starts_with", &prefix), move |s: &String| {
        s.starts_with(prefix.as_str())
    })
}

pub fn ends_with(suffix: impl Into<String>) -> Predicate {
    let suffix = suffix.into();
    Predicate::new(labelled("ends_with", &suffix), move |s: &String| {
        s.ends_with(suffix.as_str())
    })
}

pub fn equals_ignore_case(other: impl Into<String>) -> Predicate {
    let other = other.into();
    Predicate::new(labelled("equals_ignore_case", &other), move |s: &String| {
        s.to_lowercase() == other.to_lowercase()
    })
}

pub fn is_empty_string() -> Predicate {
    Predicate::new("is_empty_string", |s: &String| s.is_empty())
}

pub fn contains<T>(entry: T) -> Predicate
where
    T: Any + PartialEq + Debug + Clone,
{
    Predicate::new(labelled("contains", &entry), move |items: &Vec<T>| {
        items.contains(&entry)
    })
}

pub fn is_empty<T: Any>() -> Predicate {
    Predicate::new("is_empty", |items: &Vec<T>| items.is_empty())
}

/// Every element satisfies `element`. Each element is tested; the first
/// failing test makes the whole predicate fail with that `Raised`.
pub fn all_match<T>(element: Predicate) -> Predicate
where
    T: Any + Debug + Clone,
{
    over_elements::<T>("all_match", element, |tests| tests.iter().all(|t| *t))
}

pub fn any_match<T>(element: Predicate) -> Predicate
where
    T: Any + Debug + Clone,
{
    over_elements::<T>("any_match", element, |tests| tests.iter().any(|t| *t))
}

pub fn none_match<T>(element: Predicate) -> Predicate
where
    T: Any + Debug + Clone,
{
    over_elements::<T>("none_match", element, |tests| !tests.iter().any(|t| *t))
}

fn over_elements<T>(name: &str, element: Predicate, fold: fn(&[bool]) -> bool) -> Predicate
where
    T: Any + Debug + Clone,
{
    let label = format!("{}[{}]", name, element.label());
    Predicate::try_new(label, move |items: &Vec<T>| {
        let mut tests = Vec::with_capacity(items.len());
        for item in items {
            tests.push(element.call(&Value::new(item.clone()))?);
        }
        Ok::<_, Raised>(fold(&tests))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(predicate: &Predicate, value: Value) -> Result<bool, Raised> {
        predicate.call(&value)
    }

    fn s(text: &str) -> Value {
        Value::new(text.to_string())
    }

    #[test]
    fn test_labels() {
        assert_eq!(equal_to("orld".to_string()).label(), "equal_to[\"orld\"]");
        assert_eq!(equal_to('z').label(), "equal_to['z']");
        assert_eq!(gt(3).label(), ">[3]");
        assert_eq!(le(2.5).label(), "<=[2.5]");
        assert_eq!(eq(7u8).label(), "=[7]");
        assert_eq!(starts_with("WO").label(), "starts_with[\"WO\"]");
        assert_eq!(all_match::<i32>(gt(0)).label(), "all_match[>[0]]");
    }

    #[test]
    fn test_string_predicates() {
        assert_eq!(test(&contains_string("orl"), s("world")), Ok(true));
        assert_eq!(test(&starts_with("wo"), s("world")), Ok(true));
        assert_eq!(test(&ends_with("xx"), s("world")), Ok(false));
        assert_eq!(test(&equals_ignore_case("WoRlD"), s("world")), Ok(true));
        assert_eq!(test(&is_empty_string(), s("")), Ok(true));
    }

    #[test]
    fn test_matches_regex_is_a_full_match() {
        let p = matches_regex("o.l").unwrap();
        assert_eq!(test(&p, s("orl")), Ok(true));
        assert_eq!(test(&p, s("world")), Ok(false));
        assert!(matches_regex("(").is_err());
    }

    #[test]
    fn test_ordering() {
        assert_eq!(test(&gt(3), Value::new(4)), Ok(true));
        assert_eq!(test(&ge(3), Value::new(3)), Ok(true));
        assert_eq!(test(&lt(3), Value::new(3)), Ok(false));
        assert_eq!(test(&eq(1.0), Value::new(1.0)), Ok(true));
        assert_eq!(
            test(&eq(1.0), Value::new(f64::NAN)).unwrap_err().kind,
            "Incomparable"
        );
    }

    #[test]
    fn test_wrong_input_type_is_a_mismatch() {
        let err = test(&gt(3), Value::new(4u64)).unwrap_err();
        assert_eq!(err.kind, "TypeMismatch");
    }

    #[test]
    fn test_options_and_booleans() {
        assert_eq!(test(&is_none::<i32>(), Value::new(None::<i32>)), Ok(true));
        assert_eq!(test(&is_some::<i32>(), Value::new(Some(1))), Ok(true));
        assert_eq!(test(&is_true(), Value::new(true)), Ok(true));
        assert_eq!(test(&is_false(), Value::new(true)), Ok(false));
        assert_eq!(test(&always_true(), Value::new(())), Ok(true));
    }

    #[test]
    fn test_same_as_uses_identity() {
        let subject = s("world");
        let p = is_same_as(subject.clone());
        assert_eq!(test(&p, subject), Ok(true));
        assert_eq!(test(&p, s("world")), Ok(false));
    }

    #[test]
    fn test_collections() {
        let items = || Value::new(vec![1, 2, 3]);
        assert_eq!(test(&contains(2), items()), Ok(true));
        assert_eq!(test(&is_empty::<i32>(), items()), Ok(false));
        assert_eq!(test(&all_match::<i32>(gt(0)), items()), Ok(true));
        assert_eq!(test(&any_match::<i32>(gt(2)), items()), Ok(true));
        assert_eq!(test(&none_match::<i32>(gt(2)), items()), Ok(false));
        assert_eq!(test(&all_match::<i32>(gt(0)), Value::new(Vec::<i32>::new())), Ok(true));
    }

    #[test]
    fn test_element_failure_propagates() {
        let err = test(&any_match::<i32>(is_true()), Value::new(vec![1])).unwrap_err();
        assert_eq!(err.kind, "TypeMismatch");
    }
}
