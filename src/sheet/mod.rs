//! Spreadsheet layer: the first sheet loaded as a plain string table.
//!
//! Cells are held as text because everything downstream (id matching,
//! list splitting, JSON passthrough) treats them as text. Absent cells
//! are the empty string, never a null marker.

pub mod read;

pub use read::read_first_sheet;

/// A loaded sheet: header names plus one `Vec<String>` per data row.
///
/// Rows are kept rectangular: every row has exactly `columns.len()`
/// cells (the loader and normalizer pad short rows with empty strings).
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the first column with the given header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
