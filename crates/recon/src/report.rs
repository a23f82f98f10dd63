//! Report document: the JSON projection of a [`ComparisonReport`].
//!
//! The wire field names (`added_vendors`, `excel_name`, `qb_name`,
//! `same_vendors`) are fixed by the downstream consumer and must not change.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::model::{ComparisonReport, Conflict, ConflictReason, VendorRecord};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedVendor {
    pub record_id: String,
    pub name: String,
}

impl From<&VendorRecord> for AddedVendor {
    fn from(record: &VendorRecord) -> Self {
        Self {
            record_id: record.record_id().to_string(),
            name: record.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    pub record_id: String,
    pub reason: ConflictReason,
    pub excel_name: Option<String>,
    pub qb_name: Option<String>,
}

impl From<&Conflict> for ConflictEntry {
    fn from(conflict: &Conflict) -> Self {
        Self {
            record_id: conflict.record_id().to_string(),
            reason: conflict.reason(),
            excel_name: conflict.source_name().map(str::to_string),
            qb_name: conflict.remote_name().map(str::to_string),
        }
    }
}

/// Persisted comparison document. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub status: String,
    pub generated_at: String,
    pub added_vendors: Vec<AddedVendor>,
    pub conflicts: Vec<ConflictEntry>,
    pub same_vendors: usize,
    pub error: Option<String>,
}

impl ReportDocument {
    pub fn from_comparison(report: &ComparisonReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            added_vendors: report.source_only.iter().map(AddedVendor::from).collect(),
            conflicts: report.conflicts.iter().map(ConflictEntry::from).collect(),
            same_vendors: report.matched_count,
            error: None,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write the document to `path`, replacing any previous content.
///
/// The JSON is rendered in memory, written to a sibling temp file, then
/// renamed over `path`, so readers never observe a partial document.
pub fn write_report(doc: &ReportDocument, path: &Path) -> Result<PathBuf, SyncError> {
    let json = doc
        .to_json_pretty()
        .map_err(|e| SyncError::persistence(path, e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SyncError::persistence(path, e))?;
        }
    }

    let tmp_path = temp_sibling(path);
    if let Err(e) = fs::write(&tmp_path, json.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(SyncError::persistence(path, e));
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(SyncError::persistence(path, e));
    }

    log::info!("JSON report saved to {}", path.display());
    Ok(path.to_path_buf())
}

/// Parse a previously written report.
pub fn read_report(path: &Path) -> Result<ReportDocument, SyncError> {
    let content = fs::read_to_string(path).map_err(|e| SyncError::persistence(path, e))?;
    serde_json::from_str(&content).map_err(|e| SyncError::persistence(path, e))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "report".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
