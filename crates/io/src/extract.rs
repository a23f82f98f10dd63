//! Column-mapped vendor extraction.
//!
//! Rows without a name or an identifier are skipped, not rejected.

use std::path::Path;

use vendorsync_recon::{Origin, RecordExtractor, SyncError, VendorRecord};

use crate::error::ExtractError;
use crate::table::{format_float, Cell, Table};

/// Which worksheet and header columns hold the vendor fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Worksheet name; ignored for CSV sources.
    pub sheet: String,
    pub id_column: String,
    pub name_column: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            sheet: "vendors".into(),
            id_column: "ID".into(),
            name_column: "Name".into(),
        }
    }
}

impl ColumnMap {
    /// Layout of a remote-directory CSV export (`record_id,name`).
    pub fn remote_export() -> Self {
        Self {
            sheet: "vendors".into(),
            id_column: "record_id".into(),
            name_column: "name".into(),
        }
    }
}

/// Reads spreadsheet-origin vendors from a workbook or CSV file.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor {
    columns: ColumnMap,
}

impl SpreadsheetExtractor {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }
}

impl RecordExtractor for SpreadsheetExtractor {
    fn extract(&self, source: &Path) -> Result<Vec<VendorRecord>, SyncError> {
        Ok(extract_records(source, &self.columns, Origin::Spreadsheet)?)
    }
}

/// Read vendor records from `path`, tagging them with `origin`.
pub fn extract_records(
    path: &Path,
    columns: &ColumnMap,
    origin: Origin,
) -> Result<Vec<VendorRecord>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let table = if is_csv(path) {
        crate::csv::read_table(path)?
    } else {
        crate::xlsx::read_sheet(path, &columns.sheet)?
    };

    let records = records_from_table(&table, columns, origin)?;
    log::debug!(
        "{}: {} of {} rows yielded vendors",
        path.display(),
        records.len(),
        table.rows.len()
    );
    Ok(records)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("tsv"))
        .unwrap_or(false)
}

fn records_from_table(
    table: &Table,
    columns: &ColumnMap,
    origin: Origin,
) -> Result<Vec<VendorRecord>, ExtractError> {
    // Empty sheet: no header row, nothing to extract
    if table.headers.is_empty() {
        return Ok(Vec::new());
    }

    let id_idx = table
        .column(&columns.id_column)
        .ok_or_else(|| ExtractError::MissingColumn(columns.id_column.clone()))?;
    let name_idx = table
        .column(&columns.name_column)
        .ok_or_else(|| ExtractError::MissingColumn(columns.name_column.clone()))?;

    let mut records = Vec::new();
    for row in &table.rows {
        let name = match row.get(name_idx) {
            Some(cell) => cell.to_text(),
            None => continue,
        };
        if name.is_empty() {
            continue;
        }

        let record_id = match row.get(id_idx).and_then(normalize_record_id) {
            Some(id) => id,
            None => continue,
        };

        records.push(VendorRecord::new(record_id, name, origin));
    }

    Ok(records)
}

/// Canonical identifier for a cell: integral numbers lose their fraction
/// (`30.0` → `"30"`, `"030"` → `"30"`), other text is trimmed. Blank → `None`.
pub fn normalize_record_id(cell: &Cell) -> Option<String> {
    let id = match cell {
        Cell::Empty => return None,
        Cell::Int(n) => n.to_string(),
        Cell::Float(n) => format_float(*n),
        Cell::Bool(_) => cell.to_text(),
        Cell::Text(s) => {
            let trimmed = s.trim();
            canonical_integer(trimmed).unwrap_or_else(|| trimmed.to_string())
        }
    };

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// `[+-]digits[.zeros]` → the integer's decimal form.
fn canonical_integer(text: &str) -> Option<String> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    if !frac_part.chars().all(|c| c == '0') {
        return None;
    }
    let digits = int_part.strip_prefix(&['+', '-'][..]).unwrap_or(int_part);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    int_part.parse::<i64>().ok().map(|n| n.to_string())
}
