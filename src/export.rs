//! Spreadsheet export of the expense log.
//!
//! Records are written as CSV with the header `ID,Category,Amount,Date,Description`,
//! which opens directly in any spreadsheet application.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::Expense;

/// Suggested file name shown in the export prompt
pub const DEFAULT_EXPORT_FILE: &str = "expenses.csv";

const EXPORT_EXTENSION: &str = "csv";

/// Result of an export request
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing was stored, so no file was written
    Empty,
    Written { path: PathBuf, rows: usize },
}

/// Turn the text typed in the export prompt into a target path.
///
/// Returns `None` for an empty answer (the export is cancelled); a missing
/// extension defaults to `.csv`.
pub fn resolve_export_path(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let mut path = PathBuf::from(input);
    if path.extension().is_none() {
        path.set_extension(EXPORT_EXTENSION);
    }
    Some(path)
}

/// Write `expenses` to `path`, or do nothing when there are none
pub fn export_expenses(path: &Path, expenses: &[Expense]) -> Result<ExportOutcome> {
    if expenses.is_empty() {
        return Ok(ExportOutcome::Empty);
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {path:?}"))?;
    for expense in expenses {
        writer
            .serialize(expense)
            .with_context(|| format!("Failed to write expense {}", expense.id))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush export file: {path:?}"))?;

    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: expenses.len(),
    })
}
