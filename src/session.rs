//! The evaluation session: a per-assertion memo of every (unit, input) pair.
//!
//! The check tree is traversed more than once for a single assertion (once to
//! decide, again to describe). Every traversal goes through one session, so a
//! body runs at most once per pair and later traversals replay its recorded
//! outcome.

use crate::config::RenderConfig;
use crate::format::{default_formatter, format_guarded, ValueFormatter};
use crate::lineage::{Lineage, LineageStep};
use crate::unit::{invoke, Body, Predicate, Unit};
use crate::value::{Outcome, Raised, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// One evaluation of a unit against an input.
#[derive(Debug, Clone)]
pub struct Record {
    pub unit: Unit,
    pub input: Value,
    pub outcome: Outcome,
    /// The outcome as formatted when it was produced.
    pub rendered: String,
}

type MemoKey = (usize, usize);

#[derive(Default)]
struct Memo {
    records: Vec<Record>,
    index: HashMap<MemoKey, usize>,
}

impl Memo {
    fn get(&self, unit: &Unit, input: &Value) -> Option<&Record> {
        self.index
            .get(&(unit.key(), input.identity()))
            .map(|&idx| &self.records[idx])
    }
}

/// Memo table and rendering context for one assertion.
///
/// Not thread-safe; create one per assertion and drop it once the failure
/// message (if any) has been rendered.
pub struct Session {
    config: RenderConfig,
    formatter: ValueFormatter,
    memo: RefCell<Memo>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            formatter: default_formatter(),
            memo: RefCell::new(Memo::default()),
        }
    }

    /// Replace the value formatter used for descriptions and diagrams.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + 'static,
    {
        self.formatter = Rc::new(formatter);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Apply `unit` to `input`, running its body only if this pair has not
    /// been evaluated in this session. A cached failure is returned again as
    /// the same `Err`.
    pub fn apply(&self, unit: &Unit, input: &Value) -> Result<Value, Raised> {
        if let Some(outcome) = self.outcome(unit, input) {
            trace!(unit = unit.label(), "memo hit");
            return outcome.into_result();
        }

        // The memo must not be borrowed here: chains re-enter `apply`.
        let outcome = match unit.body() {
            Body::Step(body) => invoke(body.as_ref(), input),
            Body::Chain(steps) => self.apply_chain(steps, input),
            Body::Identity => Outcome::Value(input.clone()),
        };

        self.record(unit, input, outcome).into_result()
    }

    /// Evaluate a predicate under the same discipline as [`apply`](Self::apply).
    /// A failing body, or a non-`bool` output, tests `false`.
    pub fn test(&self, predicate: &Predicate, input: &Value) -> bool {
        match self.apply(predicate.unit(), input) {
            Ok(value) => value.downcast_ref::<bool>().copied().unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Why `predicate` could not answer for `input`, if it could not.
    pub fn predicate_failure(&self, predicate: &Predicate, input: &Value) -> Option<Raised> {
        match self.outcome(predicate.unit(), input)? {
            Outcome::Raised(raised) => Some(raised),
            Outcome::Value(value) if value.is::<bool>() => None,
            Outcome::Value(value) => Some(Raised::type_mismatch("bool", value.type_name())),
        }
    }

    pub fn contains(&self, unit: &Unit, input: &Value) -> bool {
        self.memo.borrow().get(unit, input).is_some()
    }

    pub fn outcome(&self, unit: &Unit, input: &Value) -> Option<Outcome> {
        self.memo
            .borrow()
            .get(unit, input)
            .map(|record| record.outcome.clone())
    }

    /// The recorded outcome as it was formatted when produced.
    pub fn rendered(&self, unit: &Unit, input: &Value) -> Option<String> {
        self.memo
            .borrow()
            .get(unit, input)
            .map(|record| record.rendered.clone())
    }

    /// Steps evaluated while applying `chain` to `input`, in order, up to and
    /// including the first failing one. `None` if `chain` is not a chain or
    /// was never applied to `input`.
    pub fn lineage(&self, chain: &Unit, input: &Value) -> Option<Lineage> {
        let steps = chain.steps()?;
        let memo = self.memo.borrow();
        memo.get(chain, input)?;

        let mut current = input.clone();
        let mut recorded = Vec::new();
        for step in steps {
            let record = match memo.get(step, &current) {
                Some(record) => record,
                None => break,
            };
            recorded.push(LineageStep {
                label: step.label().to_string(),
                outcome: record.outcome.clone(),
                rendered: record.rendered.clone(),
            });
            match &record.outcome {
                Outcome::Value(value) => current = value.clone(),
                Outcome::Raised(_) => break,
            }
        }

        Some(Lineage {
            chain: chain.clone(),
            input: input.clone(),
            steps: recorded,
        })
    }

    /// One lineage per input `chain` was applied to, in session order.
    pub fn lineages(&self, chain: &Unit) -> Vec<Lineage> {
        let inputs: Vec<Value> = self
            .memo
            .borrow()
            .records
            .iter()
            .filter(|record| record.unit.same_as(chain))
            .map(|record| record.input.clone())
            .collect();
        inputs
            .iter()
            .filter_map(|input| self.lineage(chain, input))
            .collect()
    }

    /// Every record, in the order it was produced.
    pub fn records(&self) -> Vec<Record> {
        self.memo.borrow().records.clone()
    }

    /// Every captured failure with the label of the unit that raised it.
    /// A chain's own failure repeats its failing step's and is left out.
    pub fn raised(&self) -> Vec<(String, Raised)> {
        self.memo
            .borrow()
            .records
            .iter()
            .filter(|record| !record.unit.is_chain())
            .filter_map(|record| {
                record
                    .outcome
                    .raised()
                    .map(|raised| (record.unit.label().to_string(), raised.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.memo.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Format a value with this session's formatter, falling back to the
    /// configured placeholder if formatting panics.
    pub fn format(&self, value: &Value) -> String {
        format_guarded(&self.formatter, value, &self.config.placeholder)
    }

    fn render_outcome(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Value(value) => self.format(value),
            Outcome::Raised(raised) => raised.to_string(),
        }
    }

    fn record(&self, unit: &Unit, input: &Value, outcome: Outcome) -> Outcome {
        if let Some(existing) = self.outcome(unit, input) {
            return existing;
        }

        // Formatted now so a receiver mutated by later steps still shows the
        // state it had at this step.
        let rendered = self.render_outcome(&outcome);
        match &outcome {
            Outcome::Value(_) => {
                debug!(unit = unit.label(), value = %rendered, "step evaluated");
            }
            Outcome::Raised(raised) => {
                warn!(unit = unit.label(), error = %raised, "step raised");
            }
        }

        let mut memo = self.memo.borrow_mut();
        let idx = memo.records.len();
        memo.records.push(Record {
            unit: unit.clone(),
            input: input.clone(),
            outcome: outcome.clone(),
            rendered,
        });
        memo.index.insert((unit.key(), input.identity()), idx);
        outcome
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("records", &self.len())
            .finish()
    }
}
