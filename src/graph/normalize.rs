//! Row normalization: blank fill plus line-break rewriting.
//!
//! Only the `details` column gets its line breaks rewritten; every other
//! column passes through byte-for-byte. The visualizer renders `details`
//! as HTML, so embedded breaks become a literal `<br>`.

use crate::Result;
use crate::sheet::Table;

use regex::Regex;

const DETAILS_COLUMN: &str = "details";

/// Normalize a loaded table in place.
///
/// 1) Pad any short row with empty strings so the table is rectangular.
/// 2) In the `details` column (if present), replace every run of
///    `\r\n`, `\r`, or `\n` with the literal token `<br>`.
///
/// A missing `details` column is a warning, never an error.
pub fn normalize_rows(table: &mut Table) -> Result<()> {
    let width = table.columns.len();
    for row in &mut table.rows {
        if row.len() < width {
            row.resize(width, String::new());
        }
    }

    let details = match table.column_index(DETAILS_COLUMN) {
        Some(idx) => idx,
        None => {
            eprintln!(
                "warning: no '{}' column in sheet, skipping line-break rewrite",
                DETAILS_COLUMN
            );
            return Ok(());
        }
    };

    let line_break = Regex::new(r"\r\n|\r|\n")?;
    for row in &mut table.rows {
        if line_break.is_match(&row[details]) {
            let rewritten = line_break.replace_all(&row[details], "<br>").into_owned();
            row[details] = rewritten;
        }
    }

    Ok(())
}
