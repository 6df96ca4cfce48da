//! Failure message layout.
//!
//! ```text
//! x="WORLD" [satisfies
//! x.to_lowercase().substring(1) equal_to["xyz"]]
//! ```

/// `x=<subject> [satisfies` followed by the expectation lines.
pub fn satisfies(subject_name: &str, subject: &str, expectation: &[String]) -> String {
    block(subject_name, subject, "satisfies", expectation, false)
}

/// `x=<subject> [did not satisfy` followed by the mismatch lines, and
/// `FAILED` when a step or predicate raised.
pub fn did_not_satisfy(subject_name: &str, subject: &str, mismatch: &[String], failed: bool) -> String {
    block(subject_name, subject, "did not satisfy", mismatch, failed)
}

/// The two blocks in the usual comparison layout.
pub fn comparison(expected: &str, actual: &str) -> String {
    format!("expected:<{}> but was:<{}>", expected, actual)
}

fn block(subject_name: &str, subject: &str, verb: &str, lines: &[String], failed: bool) -> String {
    let mut output = format!("{}={} [{}", subject_name, subject, verb);
    for line in lines {
        output.push('\n');
        output.push_str(line);
    }
    if failed {
        output.push_str("\nFAILED");
    }
    output.push(']');
    output
}
