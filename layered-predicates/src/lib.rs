#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-assert/main/assets/layered-assert.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-assert/issues/"
)]

//! Labelled predicates and functions for building `layered-assert` checks.
//!
//! Every item here is an ordinary [`Predicate`](layered_assert::Predicate) or
//! [`Unit`](layered_assert::Unit) whose label reads the way it is written:
//! `equal_to["orld"]`, `>[3]`, `substring(2)`, `char_at(1)`.
//!
//! ```
//! use layered_assert::{evaluate, Check, Unit, Value};
//! use layered_predicates::{functions, predicates};
//!
//! let chain = Unit::chain(vec![functions::to_lowercase(), functions::substring(1)]).unwrap();
//! let check = Check::leaf(chain, predicates::equal_to("orld".to_string()));
//! assert!(evaluate(&check, Value::new("WORLD".to_string())).passed);
//! ```

pub mod combinators;
pub mod functions;
pub mod predicates;

pub use combinators::{PredicateExt, UnitExt};
pub use functions::IndexOutOfRange;

use layered_assert::{format_value, Value};
use std::any::Any;
use std::fmt::Debug;

/// `name[argument]`, the argument written the way diagrams write values.
pub(crate) fn labelled<T: Any + Debug + Clone>(name: &str, argument: &T) -> String {
    format!("{}[{}]", name, format_value(&Value::new(argument.clone())))
}
