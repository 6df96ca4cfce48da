//! Chain evaluation.
//!
//! A chain applies its steps one after another through the session, so every
//! intermediate `(step, input) -> outcome` is recorded. The first failing step
//! ends the chain: steps after it are never invoked and never recorded.

use crate::session::Session;
use crate::unit::Unit;
use crate::value::{Outcome, Value};
use tracing::debug;

impl Session {
    pub(crate) fn apply_chain(&self, steps: &[Unit], input: &Value) -> Outcome {
        let mut current = input.clone();
        for (idx, step) in steps.iter().enumerate() {
            match self.apply(step, &current) {
                Ok(value) => current = value,
                Err(raised) => {
                    debug!(
                        step = step.label(),
                        skipped = steps.len() - idx - 1,
                        "chain stopped"
                    );
                    return Outcome::Raised(raised);
                }
            }
        }
        Outcome::Value(current)
    }
}
