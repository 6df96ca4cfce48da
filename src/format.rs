//! Default value formatting.
//!
//! Strings and chars are quoted, numbers and booleans are written bare, and
//! anything else is written as `<Debug>:TypeName`.

use crate::value::{short_type_name, Value};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Caller-supplied formatting used by leaf descriptions and lineage diagrams.
pub type ValueFormatter = Rc<dyn Fn(&Value) -> String>;

macro_rules! bare {
    ($value:expr, $($ty:ty),+) => {
        $(
            if let Some(v) = $value.downcast_ref::<$ty>() {
                return v.to_string();
            }
        )+
    };
}

pub fn format_value(value: &Value) -> String {
    if let Some(s) = value.downcast_ref::<String>() {
        return format!("{:?}", s);
    }
    if let Some(s) = value.downcast_ref::<&'static str>() {
        return format!("{:?}", s);
    }
    if let Some(c) = value.downcast_ref::<char>() {
        return format!("{:?}", c);
    }
    bare!(value, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
    if value.is::<()>() {
        return "()".to_string();
    }
    format!("<{:?}>:{}", value, short_type_name(value.type_name()))
}

pub fn default_formatter() -> ValueFormatter {
    Rc::new(format_value)
}

/// Run a formatter, writing `placeholder` if it panics.
pub(crate) fn format_guarded(formatter: &ValueFormatter, value: &Value, placeholder: &str) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| formatter(value)))
        .unwrap_or_else(|_| placeholder.to_string())
}
