//! Functions: single labelled steps to put in chains.

use layered_assert::{Raised, Unit, Value};
use regex::Regex;
use std::cell::RefCell;
use std::convert::TryFrom;
use thiserror::Error;

/// Raised by [`substring`] and [`char_at`] when the index is past the end of
/// the string, or negative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("String index out of range: {index}")]
pub struct IndexOutOfRange {
    pub index: i64,
}

pub fn to_lowercase() -> Unit {
    Unit::function("to_lowercase()", |s: &String| s.to_lowercase())
}

pub fn to_uppercase() -> Unit {
    Unit::function("to_uppercase()", |s: &String| s.to_uppercase())
}

pub fn trim() -> Unit {
    Unit::function("trim()", |s: &String| s.trim().to_string())
}

/// Length in chars.
pub fn length() -> Unit {
    Unit::function("len()", |s: &String| s.chars().count())
}

/// The chars from `begin` on. `begin` equal to the length gives `""`.
pub fn substring(begin: i64) -> Unit {
    Unit::try_function(format!("substring({})", begin), move |s: &String| {
        let count = s.chars().count();
        match usize::try_from(begin) {
            Ok(start) if start <= count => Ok(s.chars().skip(start).collect::<String>()),
            _ => Err(IndexOutOfRange { index: begin }),
        }
    })
}

pub fn char_at(index: i64) -> Unit {
    Unit::try_function(format!("char_at({})", index), move |s: &String| {
        usize::try_from(index)
            .ok()
            .and_then(|i| s.chars().nth(i))
            .ok_or(IndexOutOfRange { index })
    })
}

pub fn concat(suffix: impl Into<String>) -> Unit {
    let suffix = suffix.into();
    Unit::function(format!("concat({:?})", suffix), move |s: &String| {
        format!("{}{}", s, suffix)
    })
}

/// Replace every match of `pattern`.
pub fn replace_all(pattern: &str, replacement: impl Into<String>) -> Result<Unit, regex::Error> {
    let regex = Regex::new(pattern)?;
    let replacement = replacement.into();
    let label = format!("replace_all({:?},{:?})", pattern, replacement);
    Ok(Unit::function(label, move |s: &String| {
        regex.replace_all(s, replacement.as_str()).into_owned()
    }))
}

/// Append to a `RefCell<String>` receiver in place and hand back the same
/// receiver, like a builder method returning `self`.
pub fn append(text: impl Into<String>) -> Unit {
    let text = text.into();
    Unit::step(format!("append({:?})", text), move |receiver: &Value| {
        let buffer = receiver.downcast_ref::<RefCell<String>>().ok_or_else(|| {
            Raised::new(
                "TypeMismatch",
                format!("expected RefCell<String>, found {}", receiver.type_name()),
            )
        })?;
        buffer.borrow_mut().push_str(&text);
        Ok(receiver.clone())
    })
}

/// A `String` snapshot of a `RefCell<String>` receiver.
pub fn to_string_value() -> Unit {
    Unit::function("to_string()", |buffer: &RefCell<String>| buffer.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(unit: &Unit, input: &str) -> Result<Value, Raised> {
        unit.call(&Value::new(input.to_string()))
    }

    fn text(result: Result<Value, Raised>) -> String {
        result.unwrap().downcast_ref::<String>().cloned().unwrap()
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(text(call(&to_lowercase(), "WORLD")), "world");
        assert_eq!(text(call(&to_uppercase(), "world")), "WORLD");
        assert_eq!(text(call(&trim(), "  a b ")), "a b");
    }

    #[test]
    fn test_substring_bounds() {
        assert_eq!(text(call(&substring(2), "world")), "rld");
        assert_eq!(text(call(&substring(5), "world")), "");

        let err = call(&substring(-2), "world").unwrap_err();
        assert_eq!(
            err,
            Raised::new("IndexOutOfRange", "String index out of range: -2")
        );
        assert_eq!(call(&substring(6), "world").unwrap_err().kind, "IndexOutOfRange");
    }

    #[test]
    fn test_char_at() {
        let out = call(&char_at(1), "rld").unwrap();
        assert_eq!(out.downcast_ref::<char>(), Some(&'l'));
        assert_eq!(call(&char_at(3), "rld").unwrap_err().kind, "IndexOutOfRange");
    }

    #[test]
    fn test_length_counts_chars() {
        let out = call(&length(), "héllo").unwrap();
        assert_eq!(out.downcast_ref::<usize>(), Some(&5));
    }

    #[test]
    fn test_concat_and_replace_all() {
        assert_eq!(concat("XYZ").label(), "concat(\"XYZ\")");
        assert_eq!(text(call(&concat("XYZ"), "orl")), "orlXYZ");

        let replace = replace_all("d", "DDD").unwrap();
        assert_eq!(replace.label(), "replace_all(\"d\",\"DDD\")");
        assert_eq!(text(call(&replace, "orld")), "orlDDD");
        assert!(replace_all("[", "").is_err());
    }

    #[test]
    fn test_append_returns_the_same_receiver() {
        let receiver = Value::new(RefCell::new(String::new()));
        let out = append("hello").call(&receiver).unwrap();
        assert!(out.same_as(&receiver));

        let snapshot = to_string_value().call(&out).unwrap();
        assert_eq!(snapshot.downcast_ref::<String>().map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_append_rejects_other_receivers() {
        let err = call(&append("x"), "plain").unwrap_err();
        assert_eq!(err.kind, "TypeMismatch");
    }
}
