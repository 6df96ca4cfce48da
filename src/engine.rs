//! Entry points: evaluate a tree once, then explain it from the same session.

use crate::check::Check;
use crate::errors::{AssertError, AssertResult};
use crate::lineage::diagram;
use crate::session::Session;
use crate::unit::Unit;
use crate::value::{Outcome, Value};
use tracing::{debug, warn};

/// Result of evaluating a check tree against a subject.
///
/// The session is handed back so the same evaluation can be explained
/// without running any body a second time.
#[derive(Debug)]
pub struct Evaluation {
    pub passed: bool,
    pub session: Session,
    pub subject: Value,
}

impl Evaluation {
    pub fn explain(&self, check: &Check) -> AssertResult<Vec<String>> {
        explain(check, &self.subject, &self.session)
    }
}

/// Evaluate `check` against `subject` in a fresh session.
pub fn evaluate(check: &Check, subject: Value) -> Evaluation {
    evaluate_with(check, subject, Session::new())
}

/// Evaluate `check` against `subject` in the given (normally fresh) session.
pub fn evaluate_with(check: &Check, subject: Value, session: Session) -> Evaluation {
    let passed = check.matches(&subject, &session);
    debug!(passed, records = session.len(), "check evaluated");
    Evaluation {
        passed,
        session,
        subject,
    }
}

/// Describe how `subject` fared against `check`.
///
/// `session` must be the one `evaluate` used for this subject and tree. A
/// session missing the transform record of some leaf, or the predicate
/// record for a transform that produced a value, would have to run a body
/// again, so it is refused.
pub fn explain(check: &Check, subject: &Value, session: &Session) -> AssertResult<Vec<String>> {
    for leaf in check.leaves() {
        let evaluated = match session.outcome(&leaf.transform, subject) {
            None => false,
            Some(Outcome::Raised(_)) => true,
            Some(Outcome::Value(value)) => session.contains(leaf.predicate.unit(), &value),
        };
        if !evaluated {
            let leaf = leaf.expectation(session);
            warn!(leaf = %leaf, "explain called with a session that did not evaluate the tree");
            return Err(AssertError::ExplainMisuse { leaf });
        }
    }
    Ok(check.describe_mismatch(subject, session))
}

/// Diagrams for every application of `chain` recorded in `session`.
pub fn render(chain: &Unit, session: &Session) -> Vec<String> {
    session
        .lineages(chain)
        .iter()
        .flat_map(|lineage| diagram(session, chain, &lineage.input, None))
        .collect()
}
