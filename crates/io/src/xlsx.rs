// Excel workbook reading (xlsx, xls, xlsb, ods)
//
// Only cached cell values are read; formulas are not evaluated.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::ExtractError;
use crate::table::{Cell, Table};

/// Read the named worksheet as a table whose first row is the header.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<Table, ExtractError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ExtractError::Workbook(e.to_string()))?;

    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(ExtractError::MissingSheet(sheet_name.to_string()));
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| ExtractError::Workbook(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(Table::from_rows(rows))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Float(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Dates are kept as their serial number; errors as text
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}
