//! Turning an evaluation into a test failure.

use crate::report;
use layered_assert::{evaluate_with, AssertError, Check, Outcome, Raised, RenderConfig, Session, Value};
use std::any::Any;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, info};

/// Why a subject failed verification.
#[derive(Debug, Error)]
pub enum AssertionFailure {
    /// The checks answered `false`.
    #[error("{}", report::comparison(.expected, .actual))]
    Comparison { expected: String, actual: String },

    /// A step or predicate raised while the checks were evaluated.
    #[error("{message}")]
    Execution { message: String },

    /// The check tree could not be explained.
    #[error(transparent)]
    Engine(#[from] AssertError),
}

/// Verifies subjects against checks under one render configuration.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: RenderConfig,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Evaluate `check` once against `subject` and, if it fails, explain it
    /// from the same session.
    pub fn verify(&self, subject: Value, check: &Check) -> Result<(), AssertionFailure> {
        let evaluation = evaluate_with(check, subject, Session::with_config(self.config.clone()));
        if evaluation.passed {
            debug!("verification passed");
            return Ok(());
        }

        let session = &evaluation.session;
        let mismatch = evaluation.explain(check)?;
        let subject_name = &self.config.subject_name;
        let subject_text = session.format(&evaluation.subject);
        let expected = report::satisfies(
            subject_name,
            &subject_text,
            &check.describe_expectation(session),
        );

        let mut raised = session.raised();
        raised.extend(predicate_failures(check, &evaluation.subject, session));
        if raised.is_empty() {
            info!(subject = %subject_text, "verification failed");
            let actual = report::did_not_satisfy(subject_name, &subject_text, &mismatch, false);
            return Err(AssertionFailure::Comparison { expected, actual });
        }

        for (unit, failure) in &raised {
            info!(unit = %unit, failure = %failure, "verification raised");
        }
        let actual = report::did_not_satisfy(subject_name, &subject_text, &mismatch, true);
        Err(AssertionFailure::Execution {
            message: report::comparison(&expected, &actual),
        })
    }
}

/// Predicates that answered with something other than a `bool`. A predicate
/// that raised is already among the session's captured failures.
fn predicate_failures(check: &Check, subject: &Value, session: &Session) -> Vec<(String, Raised)> {
    check
        .leaves()
        .into_iter()
        .filter_map(|leaf| {
            let value = session.outcome(&leaf.transform, subject)?.value()?.clone();
            match session.outcome(leaf.predicate.unit(), &value)? {
                Outcome::Value(_) => session
                    .predicate_failure(&leaf.predicate, &value)
                    .map(|failure| (leaf.predicate.label().to_string(), failure)),
                Outcome::Raised(_) => None,
            }
        })
        .collect()
}

/// [`Verifier::verify`] with the default configuration.
pub fn verify<T: Any + Debug>(subject: T, check: &Check) -> Result<(), AssertionFailure> {
    Verifier::new().verify(Value::new(subject), check)
}

/// Panic with the failure message unless `subject` passes `check`.
pub fn assert_that<T: Any + Debug>(subject: T, check: &Check) {
    if let Err(failure) = verify(subject, check) {
        panic!("{}", failure);
    }
}
