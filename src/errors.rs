//! Error types for the assertion engine.
//!
//! Only structural problems and misuse propagate as errors. A step or
//! predicate that fails while being evaluated is captured as
//! [`Raised`](crate::Raised) data and never surfaces here.

use thiserror::Error;

/// Errors that can occur while building or explaining checks.
#[derive(Debug, Error)]
pub enum AssertError {
    /// A check tree or chain was built with an invalid structure.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// `explain` was handed a session that never evaluated the tree.
    #[error("explain called with a session that has no record for `{leaf}`")]
    ExplainMisuse { leaf: String },

    /// A render configuration could not be parsed.
    #[error("invalid render config: {message}")]
    Config { message: String },
}

impl AssertError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AssertError::Configuration {
            message: message.into(),
        }
    }
}

/// Result type for engine operations.
pub type AssertResult<T> = Result<T, AssertError>;
