//! Spreadsheet loading via calamine (xlsx, xls, ods).
//!
//! Only the first sheet is read. The first row is the header; every
//! following row becomes one data row of cell text.

use crate::Result;
use crate::sheet::Table;

use anyhow::{Context, bail};
use calamine::{Data, Reader, open_workbook_auto};

/// Load the first sheet of a spreadsheet into a string table.
pub fn read_first_sheet(path: &str) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("open spreadsheet {}", path))?;

    let sheet_name = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => bail!("spreadsheet {} contains no sheets", path),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("read sheet '{}' of {}", sheet_name, path))?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => bail!("sheet '{}' of {} is empty", sheet_name, path),
    };

    let columns: Vec<String> = header.iter().map(cell_text).collect();

    let rows: Vec<Vec<String>> = rows
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(cell_text).collect();
            cells.resize(columns.len(), String::new());
            cells
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Convert one cell to its text form.
///
/// Empty and error cells become the empty string (the blank-fill rule).
/// Whole floats render as integers so a numeric id column reads back as
/// "1", not "1.0".
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => float_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => datetime_text(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Format an Excel serial datetime (days since 1899-12-30) as ISO-8601.
fn datetime_text(serial: f64) -> String {
    let days = serial.floor() as i64;
    let total_seconds = (serial.fract() * 86_400.0).round() as u32;

    let epoch = match chrono::NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(d) => d,
        None => return serial.to_string(),
    };
    let date = epoch + chrono::Duration::days(days);

    let time = chrono::NaiveTime::from_hms_opt(
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60,
    )
    .unwrap_or_default();

    chrono::NaiveDateTime::new(date, time)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_error_cells_become_empty_strings() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Error(calamine::CellErrorType::Div0)), "");
    }

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(cell_text(&Data::Float(1.0)), "1");
        assert_eq!(cell_text(&Data::Float(42.0)), "42");
        assert_eq!(cell_text(&Data::Float(-3.0)), "-3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
    }

    #[test]
    fn scalar_cells_render_as_text() {
        assert_eq!(cell_text(&Data::String("abc".into())), "abc");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-01-02T03:04:05".into())),
            "2024-01-02T03:04:05"
        );
    }

    #[test]
    fn serial_datetimes_render_as_iso() {
        // 45292.5 = 2024-01-01 12:00:00
        assert_eq!(datetime_text(45_292.5), "2024-01-01T12:00:00");
    }
}
