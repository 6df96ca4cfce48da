#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-assert/main/assets/layered-assert.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-assert/issues/"
)]

//! Diagnostic assertion engine.
//!
//! A subject is checked against a tree of [`Check`]s whose leaves pair a
//! transform (often a chain of named steps) with a predicate. When the tree
//! fails, the same [`Session`] that evaluated it is used to explain the
//! failure, down to the value every step of every chain produced, without
//! running any step a second time.
//!
//! ```
//! use layered_assert::{evaluate, Check, Predicate, Unit, Value};
//!
//! let chain = Unit::chain(vec![
//!     Unit::function("to_lowercase()", |s: &String| s.to_lowercase()),
//!     Unit::function("len()", |s: &String| s.len()),
//! ])
//! .unwrap();
//! let check = Check::leaf(chain, Predicate::new("==[4]", |n: &usize| *n == 4));
//!
//! let evaluation = evaluate(&check, Value::new("WORLD".to_string()));
//! assert!(!evaluation.passed);
//! let lines = evaluation.explain(&check).unwrap();
//! assert!(lines[0].contains("x.to_lowercase().len()=5"));
//! ```
//!
//! ## Modules
//!
//! - [`unit`] - Named transformations and predicates
//! - [`session`] - Per-assertion memo of every evaluation
//! - [`check`] - The check tree and its descriptions
//! - [`lineage`] - Recorded chain lineage and its aligned diagram
//! - [`format`] - Default value formatting
//! - [`config`] - Render configuration
//! - [`errors`] - Error types

mod chain;
pub mod check;
pub mod config;
mod engine;
pub mod errors;
pub mod format;
pub mod lineage;
pub mod session;
pub mod unit;
mod value;

pub use check::{Check, Leaf, Op};
pub use config::RenderConfig;
pub use engine::{evaluate, evaluate_with, explain, render, Evaluation};
pub use errors::{AssertError, AssertResult};
pub use format::{format_value, ValueFormatter};
pub use lineage::{ChainDisplay, Lineage, LineageStep};
pub use session::{Record, Session};
pub use unit::{Predicate, Unit};
pub use value::{short_type_name, Inspect, Outcome, Raised, Value};
