use super::Lineage;
use crate::unit::Unit;
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

/// Aligned diagram of a chain and the value each of its steps produced.
pub struct ChainDisplay<'a> {
    lineage: &'a Lineage,
    subject_name: String,
    suffix: Option<String>,
}

// x.to_uppercase().substring(2).char_at(1) equal_to['z']
//                |            |          |
//                |            |          +-'L'
//                |            |
//                |            +------------"RLD"
//                |
//                +-------------------------"WORLD"
//
// Each bar sits under the last character of its step's label. The last step
// is drawn first; earlier steps extend their leader so every value starts in
// the same column. A chain that stopped early only gets bars for the steps
// that ran, the last of which shows the failure.
impl<'a> std::fmt::Display for ChainDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut is_first = true;
        for row in self.rows() {
            if is_first {
                is_first = false;
            } else {
                f.write_char('\n')?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

impl<'a> ChainDisplay<'a> {
    pub fn new(lineage: &'a Lineage, subject_name: &str) -> Self {
        ChainDisplay {
            lineage,
            subject_name: subject_name.to_string(),
            suffix: None,
        }
    }

    /// Text written after the expression on the first row, e.g. the predicate.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.rows()
    }

    fn rows(&self) -> Vec<String> {
        let (mut expression, columns) = self.expression_with_columns();
        if let Some(suffix) = &self.suffix {
            expression.push(' ');
            expression.push_str(suffix);
        }

        let mut rows = vec![expression];
        let recorded = self.lineage.steps.len().min(columns.len());
        if recorded == 0 {
            return rows;
        }

        let value_col = columns[recorded - 1] + 2;
        rows.push(bars(&columns[..recorded]));
        for idx in (0..recorded).rev() {
            let mut row = bars(&columns[..idx]);
            pad_to(&mut row, columns[idx]);
            row.push('+');
            row.extend(std::iter::repeat('-').take(value_col - columns[idx] - 1));
            row.push_str(&self.lineage.steps[idx].rendered);
            rows.push(row);

            if idx > 0 {
                rows.push(bars(&columns[..idx]));
            }
        }
        rows
    }

    /// The full chain expression, and for each step the display column of
    /// the last character of its label.
    fn expression_with_columns(&self) -> (String, Vec<usize>) {
        let steps: &[Unit] = self.lineage.chain.steps().unwrap_or(&[]);
        let mut expression = self.subject_name.clone();
        let mut columns = Vec::with_capacity(steps.len());
        for step in steps {
            if !step.label().is_empty() {
                expression.push('.');
                expression.push_str(step.label());
            }
            columns.push(UnicodeWidthStr::width(&*expression).saturating_sub(1));
        }
        (expression, columns)
    }
}

fn bars(columns: &[usize]) -> String {
    let mut row = String::new();
    for &col in columns {
        pad_to(&mut row, col);
        row.push('|');
    }
    row
}

fn pad_to(row: &mut String, col: usize) {
    // rows below the expression are ASCII, so length is display width
    while row.len() < col {
        row.push(' ');
    }
}
