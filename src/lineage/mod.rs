//! Recorded lineage of a chain applied to one input.

mod display;

pub use display::ChainDisplay;

use crate::session::Session;
use crate::unit::Unit;
use crate::value::{Outcome, Value};

/// What a session recorded while applying `chain` to `input`.
#[derive(Debug, Clone)]
pub struct Lineage {
    pub chain: Unit,
    pub input: Value,
    /// Evaluated steps in application order; stops at the first failure.
    pub steps: Vec<LineageStep>,
}

/// One evaluated step of a chain.
#[derive(Debug, Clone)]
pub struct LineageStep {
    pub label: String,
    pub outcome: Outcome,
    /// The outcome as formatted when the step ran.
    pub rendered: String,
}

impl Lineage {
    /// Every step ran and none failed.
    pub fn is_complete(&self) -> bool {
        let total = self.chain.steps().map_or(0, <[Unit]>::len);
        self.steps.len() == total && self.steps.iter().all(|step| !step.outcome.is_raised())
    }

    pub fn failed_step(&self) -> Option<&LineageStep> {
        self.steps.iter().find(|step| step.outcome.is_raised())
    }

    pub fn display<'a>(&'a self, subject_name: &str) -> ChainDisplay<'a> {
        ChainDisplay::new(self, subject_name)
    }
}

/// Diagram rows for `chain` applied to `input`, empty if it is not a recorded
/// chain. A split chain draws its base from the subject, then the rest from
/// the base's output under the intermediate name.
pub(crate) fn diagram(session: &Session, chain: &Unit, input: &Value, suffix: Option<&str>) -> Vec<String> {
    let config = session.config();
    let (base, rest) = match chain.split() {
        Some(parts) => parts,
        None => return named_diagram(session, chain, input, &config.subject_name, suffix),
    };

    let base_name = format!("{}={}", config.intermediate_name, config.subject_name);
    let mut rows = named_diagram(session, base, input, &base_name, None);
    if let Some(Outcome::Value(output)) = session.outcome(base, input) {
        rows.extend(named_diagram(session, rest, &output, &config.intermediate_name, suffix));
    }
    rows
}

fn named_diagram(
    session: &Session,
    chain: &Unit,
    input: &Value,
    name: &str,
    suffix: Option<&str>,
) -> Vec<String> {
    let lineage = match session.lineage(chain, input) {
        Some(lineage) => lineage,
        None => return Vec::new(),
    };
    let display = lineage.display(name);
    match suffix {
        Some(suffix) => display.with_suffix(suffix).lines(),
        None => display.lines(),
    }
}
