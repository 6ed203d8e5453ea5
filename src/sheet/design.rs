use std::fmt;

use serde::Serialize;

use crate::error::Error;
use crate::sheet::SampleSheet;

/// Columns of the experimental design summary.
pub const DESIGN_HEADER: [&str; 4] = ["Sample_ID", "Sample_Name", "Library_ID", "Description"];

/// A per-sample summary of identifiers, one row per sample in sheet order.
///
/// `Display` renders a pipe (Markdown) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentalDesign {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SampleSheet {
    /// Summarize samples by [`DESIGN_HEADER`]; missing values are empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSamples` if the sheet has no samples.
    pub fn experimental_design(&self) -> Result<ExperimentalDesign, Error> {
        if self.is_empty() {
            return Err(Error::NoSamples);
        }

        let rows = self
            .iter()
            .map(|sample| {
                DESIGN_HEADER
                    .iter()
                    .map(|key| sample.get(key).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Ok(ExperimentalDesign {
            columns: DESIGN_HEADER.iter().map(ToString::to_string).collect(),
            rows,
        })
    }
}

impl ExperimentalDesign {
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(String::len)
                    .chain(std::iter::once(column.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for ExperimentalDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| format!("{:<w$}", cells.get(i).map_or("", String::as_str)))
                .collect();
            writeln!(f, "| {} |", padded.join(" | "))
        };

        write_row(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|&w| format!(":{}", "-".repeat(w + 1))).collect();
        writeln!(f, "|{}|", rule.join("|"))?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}
