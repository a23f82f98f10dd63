use std::fmt;
use std::path::PathBuf;

use vendorsync_recon::SyncError;

#[derive(Debug)]
pub enum ExtractError {
    /// Source path does not exist.
    NotFound(PathBuf),
    /// Workbook has no worksheet with the configured name.
    MissingSheet(String),
    /// Header row lacks a mapped column.
    MissingColumn(String),
    /// Workbook could not be opened or decoded.
    Workbook(String),
    /// CSV could not be read or parsed.
    Csv(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "workbook not found: {}", path.display()),
            Self::MissingSheet(name) => write!(f, "worksheet '{name}' not found in workbook"),
            Self::MissingColumn(name) => write!(f, "header row has no '{name}' column"),
            Self::Workbook(msg) => write!(f, "cannot read workbook: {msg}"),
            Self::Csv(msg) => write!(f, "cannot read CSV: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for SyncError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound(path) => SyncError::NotFound(path),
            other => SyncError::Format(other.to_string()),
        }
    }
}
