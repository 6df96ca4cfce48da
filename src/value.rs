//! Type-erased values and evaluation outcomes.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Anything that can flow through a chain: it must be inspectable at runtime
/// (for typed steps) and debuggable (for the default formatter).
pub trait Inspect: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Full `std::any::type_name` of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug> Inspect for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A shared subject or intermediate value.
///
/// Clones share one allocation, and the allocation is what the session keys
/// its memo table on: two equal strings produced by different steps are
/// different inputs, one value handed to several steps is the same input.
#[derive(Clone)]
pub struct Value(Rc<dyn Inspect>);

impl Value {
    pub fn new<T: Any + fmt::Debug>(value: T) -> Self {
        Value(Rc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }

    /// Address of the shared allocation.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn same_as(&self, other: &Value) -> bool {
        self.identity() == other.identity()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A failure captured while evaluating a step or predicate body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}({message})")]
pub struct Raised {
    /// Short name of the error type, `panic` or `TypeMismatch`.
    pub kind: String,
    pub message: String,
}

impl Raised {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Capture an error value, naming it by its type. A `Raised` is kept as is.
    pub fn from_error<E: fmt::Display + 'static>(error: &E) -> Self {
        if let Some(raised) = (error as &dyn Any).downcast_ref::<Raised>() {
            return raised.clone();
        }
        Self::new(
            short_type_name(std::any::type_name::<E>()),
            error.to_string(),
        )
    }

    pub(crate) fn type_mismatch(expected: &str, actual: &str) -> Self {
        Self::new(
            "TypeMismatch",
            format!(
                "expected {} but got {}",
                short_type_name(expected),
                short_type_name(actual)
            ),
        )
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new("panic", message)
    }
}

/// Result of one evaluation: a produced value or a captured failure.
#[derive(Debug, Clone)]
pub enum Outcome {
    Value(Value),
    Raised(Raised),
}

impl Outcome {
    pub fn is_raised(&self) -> bool {
        matches!(self, Outcome::Raised(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Raised(_) => None,
        }
    }

    pub fn raised(&self) -> Option<&Raised> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Raised(raised) => Some(raised),
        }
    }

    pub fn into_result(self) -> Result<Value, Raised> {
        match self {
            Outcome::Value(value) => Ok(value),
            Outcome::Raised(raised) => Err(raised),
        }
    }
}

impl From<Result<Value, Raised>> for Outcome {
    fn from(result: Result<Value, Raised>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(raised) => Outcome::Raised(raised),
        }
    }
}

/// Strip module paths from a type name, keeping generic structure:
/// `core::cell::RefCell<alloc::string::String>` becomes `RefCell<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                out.push_str(last_path_segment(&segment));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let value = Value::new("world".to_string());
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("world"));
        assert!(value.downcast_ref::<char>().is_none());
        assert!(value.is::<String>());
    }

    #[test]
    fn test_identity_follows_allocation() {
        let a = Value::new(1u32);
        let b = Value::new(1u32);
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("core::cell::RefCell<alloc::string::String>"),
            "RefCell<String>"
        );
        assert_eq!(
            short_type_name("core::result::Result<u8, std::io::error::Error>"),
            "Result<u8, Error>"
        );
        assert_eq!(short_type_name("char"), "char");
    }

    #[test]
    fn test_raised_display() {
        let raised = Raised::new("IndexOutOfRange", "String index out of range: -2");
        assert_eq!(
            raised.to_string(),
            "IndexOutOfRange(String index out of range: -2)"
        );
    }

    #[test]
    fn test_raised_from_error_uses_short_type() {
        let err = "x".parse::<u8>().unwrap_err();
        let raised = Raised::from_error(&err);
        assert_eq!(raised.kind, "ParseIntError");
        assert_eq!(raised.message, err.to_string());
    }
}
