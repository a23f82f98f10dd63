// Vendor record extraction from spreadsheet sources

pub mod csv;
pub mod error;
pub mod extract;
pub mod table;
pub mod xlsx;

pub use error::ExtractError;
pub use extract::{extract_records, normalize_record_id, ColumnMap, SpreadsheetExtractor};
