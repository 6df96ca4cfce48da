//! The check tree: leaves joined by `and`, `or` and `not`.
//!
//! Every node can report what would make it pass (its expectation) and what
//! actually happened (its mismatch), whether or not it currently passes. All
//! evaluation goes through the [`Session`], so describing a node after
//! matching it replays recorded outcomes instead of running bodies again.

use crate::config::RenderConfig;
use crate::errors::{AssertError, AssertResult};
use crate::lineage::diagram;
use crate::session::Session;
use crate::unit::{Predicate, Unit};
use crate::value::Value;

/// Operator of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

impl Op {
    /// Identity element of the fold: `true` for `and`, `false` for `or`.
    pub fn seed(self) -> bool {
        match self {
            Op::And => true,
            Op::Or => false,
        }
    }

    pub fn combine(self, acc: bool, next: bool) -> bool {
        match self {
            Op::And => acc && next,
            Op::Or => acc || next,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::And => "and",
            Op::Or => "or",
        }
    }
}

/// A transform whose output must satisfy a predicate.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub transform: Unit,
    pub predicate: Predicate,
}

#[derive(Debug, Clone)]
pub enum Check {
    Leaf(Leaf),
    Composite { op: Op, children: Vec<Check> },
    Not(Box<Check>),
}

impl Check {
    pub fn leaf(transform: Unit, predicate: Predicate) -> Self {
        Check::Leaf(Leaf {
            transform,
            predicate,
        })
    }

    pub fn all(children: Vec<Check>) -> AssertResult<Self> {
        Self::composite(Op::And, children)
    }

    pub fn any(children: Vec<Check>) -> AssertResult<Self> {
        Self::composite(Op::Or, children)
    }

    /// An empty composite is a configuration error rather than a vacuous
    /// `true` or `false`.
    pub fn composite(op: Op, children: Vec<Check>) -> AssertResult<Self> {
        if children.is_empty() {
            return Err(AssertError::configuration(format!(
                "`{}` needs at least one child",
                op.name()
            )));
        }
        Ok(Check::Composite { op, children })
    }

    pub fn not(child: Check) -> Self {
        Check::Not(Box::new(child))
    }

    /// Every leaf, depth first.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            Check::Leaf(leaf) => out.push(leaf),
            Check::Composite { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Check::Not(child) => child.collect_leaves(out),
        }
    }

    /// Whether `subject` satisfies this node. Composite nodes evaluate every
    /// child, so each child's lineage is available for the mismatch report.
    pub fn matches(&self, subject: &Value, session: &Session) -> bool {
        match self {
            Check::Leaf(leaf) => leaf.matches(subject, session),
            Check::Composite { op, children } => children.iter().fold(op.seed(), |acc, child| {
                let next = child.matches(subject, session);
                op.combine(acc, next)
            }),
            Check::Not(child) => !child.matches(subject, session),
        }
    }

    pub fn describe_expectation(&self, session: &Session) -> Vec<String> {
        let (name, children) = match self.group() {
            Some(group) => group,
            None => return self.leaf_expectation(session),
        };

        let indent = session.config().indent_str();
        let mut lines = vec![format!("{}:[", name)];
        for child in children {
            lines.extend(
                child
                    .describe_expectation(session)
                    .into_iter()
                    .map(|line| format!("{}{}", indent, line)),
            );
        }
        lines.push("]".to_string());
        lines
    }

    pub fn describe_mismatch(&self, subject: &Value, session: &Session) -> Vec<String> {
        let (name, children) = match self.group() {
            Some(group) => group,
            None => return self.leaf_mismatch(subject, session),
        };

        let config = session.config();
        let indent = config.indent_str();
        let mut lines = vec![format!(
            "when {}={}; then {}:[",
            config.subject_name,
            session.format(subject),
            name
        )];
        for child in children {
            let block = if child.matches(subject, session) {
                child.describe_expectation(session)
            } else {
                child.describe_mismatch(subject, session)
            };
            lines.extend(block.into_iter().map(|line| format!("{}{}", indent, line)));
        }
        lines.push(format!("]->{}", self.matches(subject, session)));
        lines
    }

    /// Operator name and children of a non-leaf node.
    fn group(&self) -> Option<(&'static str, &[Check])> {
        match self {
            Check::Leaf(_) => None,
            Check::Composite { op, children } => Some((op.name(), children.as_slice())),
            Check::Not(child) => Some(("not", std::slice::from_ref(&**child))),
        }
    }

    fn leaf_expectation(&self, session: &Session) -> Vec<String> {
        match self {
            Check::Leaf(leaf) => vec![leaf.expectation(session)],
            _ => Vec::new(),
        }
    }

    fn leaf_mismatch(&self, subject: &Value, session: &Session) -> Vec<String> {
        match self {
            Check::Leaf(leaf) => leaf.describe_mismatch(subject, session),
            _ => Vec::new(),
        }
    }
}

impl Leaf {
    pub fn matches(&self, subject: &Value, session: &Session) -> bool {
        match session.apply(&self.transform, subject) {
            Ok(value) => session.test(&self.predicate, &value),
            Err(_) => false,
        }
    }

    /// `"<expression> <predicate>"`, independent of any subject.
    pub fn expectation(&self, session: &Session) -> String {
        format!("{} {}", self.expression(session.config()), self.predicate.label())
    }

    fn expression(&self, config: &RenderConfig) -> String {
        self.transform
            .expression_with(&config.subject_name, &config.intermediate_name)
    }

    /// The expectation and what the recorded transform produced, followed by
    /// the chain diagram when the transform is a chain.
    pub fn describe_mismatch(&self, subject: &Value, session: &Session) -> Vec<String> {
        let config = session.config();
        let expectation = self.expectation(session);

        let headline = match session.apply(&self.transform, subject) {
            Err(raised) => format!("{} failed with {}", expectation, raised),
            Ok(value) => match session.predicate_failure(&self.predicate, &value) {
                Some(raised) => format!("{} failed with {}", expectation, raised),
                None => format!(
                    "{} was not met because {}={} does not satisfy it",
                    expectation,
                    self.expression(config),
                    session
                        .rendered(&self.transform, subject)
                        .unwrap_or_else(|| session.format(&value))
                ),
            },
        };

        let mut lines = vec![headline];
        if config.inline_lineage {
            let indent = config.indent_str();
            lines.extend(
                diagram(session, &self.transform, subject, Some(self.predicate.label()))
                    .into_iter()
                    .map(|line| format!("{}{}", indent, line)),
            );
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderConfig;
    use std::cell::Cell;
    use std::rc::Rc;

    fn length_is(n: usize) -> Check {
        Check::leaf(
            Unit::function("len()", |s: &String| s.len()),
            Predicate::new(format!("==[{}]", n), move |len: &usize| *len == n),
        )
    }

    fn counted(calls: Rc<Cell<usize>>, result: bool) -> Check {
        Check::leaf(
            Unit::function("touch()", move |s: &String| {
                calls.set(calls.get() + 1);
                s.clone()
            }),
            Predicate::new(format!("always[{}]", result), move |_: &String| result),
        )
    }

    #[test]
    fn test_op_seed_and_combine() {
        assert!(Op::And.seed());
        assert!(!Op::Or.seed());
        assert!(!Op::And.combine(true, false));
        assert!(Op::Or.combine(false, true));
    }

    #[test]
    fn test_empty_composites_are_rejected() {
        assert!(matches!(
            Check::all(Vec::new()),
            Err(AssertError::Configuration { .. })
        ));
        assert!(matches!(
            Check::any(Vec::new()),
            Err(AssertError::Configuration { .. })
        ));
    }

    #[test]
    fn test_conjunction_evaluates_every_child() {
        let calls = Rc::new(Cell::new(0));
        let check = Check::all(vec![
            counted(calls.clone(), false),
            counted(calls.clone(), true),
            counted(calls.clone(), true),
        ])
        .unwrap();
        let session = Session::new();

        assert!(!check.matches(&Value::new("s".to_string()), &session));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_disjunction_evaluates_every_child() {
        let calls = Rc::new(Cell::new(0));
        let check = Check::any(vec![
            counted(calls.clone(), true),
            counted(calls.clone(), false),
        ])
        .unwrap();
        let session = Session::new();

        assert!(check.matches(&Value::new("s".to_string()), &session));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_negation_law() {
        let subjects = ["", "ab", "abcde"];
        for subject in subjects.iter() {
            for n in 0..4 {
                let session = Session::new();
                let value = Value::new(subject.to_string());
                let plain = length_is(n).matches(&value, &session);
                let negated = Check::not(length_is(n)).matches(&value, &session);
                assert_eq!(negated, !plain);
            }
        }
    }

    #[test]
    fn test_leaf_expectation() {
        let session = Session::new();
        assert_eq!(length_is(3).describe_expectation(&session), vec!["x.len() ==[3]"]);
    }

    #[test]
    fn test_composite_expectation_nests() {
        let check = Check::all(vec![
            length_is(1),
            Check::any(vec![length_is(2), length_is(3)]).unwrap(),
        ])
        .unwrap();
        let session = Session::new();
        assert_eq!(
            check.describe_expectation(&session),
            vec![
                "and:[",
                "  x.len() ==[1]",
                "  or:[",
                "    x.len() ==[2]",
                "    x.len() ==[3]",
                "  ]",
                "]",
            ]
        );
    }

    #[test]
    fn test_composite_mismatch_mixes_expectation_and_mismatch() {
        let check = Check::all(vec![length_is(2), length_is(3)]).unwrap();
        let session = Session::new();
        let subject = Value::new("ab".to_string());

        assert!(!check.matches(&subject, &session));
        assert_eq!(
            check.describe_mismatch(&subject, &session),
            vec![
                "when x=\"ab\"; then and:[",
                "  x.len() ==[2]",
                "  x.len() ==[3] was not met because x.len()=2 does not satisfy it",
                "]->false",
            ]
        );
    }

    #[test]
    fn test_disjunction_mismatch() {
        let session = Session::new();
        let subject = Value::new("ab".to_string());

        let failing = Check::any(vec![length_is(1), length_is(3)]).unwrap();
        assert!(!failing.matches(&subject, &session));
        assert_eq!(
            failing.describe_mismatch(&subject, &session),
            vec![
                "when x=\"ab\"; then or:[",
                "  x.len() ==[1] was not met because x.len()=2 does not satisfy it",
                "  x.len() ==[3] was not met because x.len()=2 does not satisfy it",
                "]->false",
            ]
        );

        let passing = Check::any(vec![length_is(2), length_is(3)]).unwrap();
        assert!(passing.matches(&subject, &session));
        assert_eq!(
            passing.describe_mismatch(&subject, &session),
            vec![
                "when x=\"ab\"; then or:[",
                "  x.len() ==[2]",
                "  x.len() ==[3] was not met because x.len()=2 does not satisfy it",
                "]->true",
            ]
        );
    }

    #[test]
    fn test_negation_mismatch_shows_passing_child_expectation() {
        let check = Check::not(length_is(5));
        let session = Session::new();
        let subject = Value::new("HELLO".to_string());

        assert!(!check.matches(&subject, &session));
        assert_eq!(
            check.describe_mismatch(&subject, &session),
            vec!["when x=\"HELLO\"; then not:[", "  x.len() ==[5]", "]->false"]
        );
        assert_eq!(
            check.describe_expectation(&session),
            vec!["not:[", "  x.len() ==[5]", "]"]
        );
    }

    #[test]
    fn test_leaf_mismatch_reports_raised_transform() {
        let check = Check::leaf(
            Unit::try_function("parse()", |s: &String| s.parse::<u8>()),
            Predicate::new("positive", |n: &u8| *n > 0),
        );
        let session = Session::new();
        let subject = Value::new("abc".to_string());

        assert!(!check.matches(&subject, &session));
        let lines = check.describe_mismatch(&subject, &session);
        assert_eq!(
            lines,
            vec!["x.parse() positive failed with ParseIntError(invalid digit found in string)"]
        );
    }

    #[test]
    fn test_leaf_mismatch_inlines_chain_diagram() {
        let chain = Unit::chain(vec![
            Unit::function("trim()", |s: &String| s.trim().to_string()),
            Unit::function("len()", |s: &String| s.len()),
        ])
        .unwrap();
        let check = Check::leaf(chain, Predicate::new("==[1]", |n: &usize| *n == 1));
        let session = Session::new();
        let subject = Value::new(" ab ".to_string());

        assert!(!check.matches(&subject, &session));
        assert_eq!(
            check.describe_mismatch(&subject, &session),
            vec![
                "x.trim().len() ==[1] was not met because x.trim().len()=2 does not satisfy it",
                "  x.trim().len() ==[1]",
                "         |     |",
                "         |     +-2",
                "         |",
                "         +-------\"ab\"",
            ]
        );

        let compact = Session::with_config(RenderConfig::compact());
        check.matches(&subject, &compact);
        assert_eq!(check.describe_mismatch(&subject, &compact).len(), 1);
    }

    #[test]
    fn test_leaves_are_depth_first() {
        let check = Check::all(vec![
            Check::not(length_is(1)),
            Check::any(vec![length_is(2), length_is(3)]).unwrap(),
        ])
        .unwrap();
        let labels: Vec<&str> = check
            .leaves()
            .into_iter()
            .map(|leaf| leaf.predicate.label())
            .collect();
        assert_eq!(labels, vec!["==[1]", "==[2]", "==[3]"]);
    }
}
