#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-assert/main/assets/layered-assert.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-assert/issues/"
)]

//! Test-facing layer over `layered-assert`: fluent builders for check trees,
//! and verification that turns a failed evaluation into a readable failure.
//!
//! ```
//! use layered_assert::Unit;
//! use layered_assert_harness::{as_string, assert_that};
//! use layered_predicates::functions::{substring, to_lowercase};
//!
//! let check = as_string(Unit::chain(vec![to_lowercase(), substring(1)]).unwrap())
//!     .equal_to("orld")
//!     .all()
//!     .unwrap();
//! assert_that("WORLD".to_string(), &check);
//! ```

pub mod bridge;
pub mod builder;
pub mod report;

pub use bridge::{assert_that, verify, AssertionFailure, Verifier};
pub use builder::{all_of, any_of, as_object, as_string, not, AsObject, AsString};
