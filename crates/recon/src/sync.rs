//! Sync orchestration: extract → fetch → reconcile → persist → write-back.
//!
//! Steps 1–4 are fatal on error. Write-back is best-effort: its failures are
//! logged and never change the result or the already-written report.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::engine::reconcile;
use crate::error::SyncError;
use crate::model::{SubmitOutcome, SubmitStatus, VendorRecord, WriteBackSummary};
use crate::report::{write_report, ReportDocument};

/// Turns a tabular source into spreadsheet-origin vendor records.
pub trait RecordExtractor {
    fn extract(&self, source: &Path) -> Result<Vec<VendorRecord>, SyncError>;
}

/// The remote vendor directory.
pub trait VendorDirectory {
    /// Fetch all remote vendors for the given company selector.
    fn fetch(&self, selector: &str) -> Result<Vec<VendorRecord>, SyncError>;

    /// Submit records for creation. Per-record rejections are reported as
    /// outcomes; `Err` means the whole exchange failed.
    fn submit_batch(&self, records: &[VendorRecord]) -> Result<Vec<SubmitOutcome>, SyncError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteBack {
    /// Nothing source-only to submit.
    Skipped,
    Completed(WriteBackSummary),
    /// The batch call itself failed; message already logged.
    Failed(String),
}

/// Everything a caller may want to know about one run.
#[derive(Debug, Clone)]
pub struct SyncRun {
    pub report_path: PathBuf,
    pub document: ReportDocument,
    pub write_back: WriteBack,
}

/// Run the pipeline and return the report path.
pub fn sync(
    extractor: &dyn RecordExtractor,
    gateway: &dyn VendorDirectory,
    selector: &str,
    source: &Path,
    output: &Path,
) -> Result<PathBuf, SyncError> {
    sync_with_summary(extractor, gateway, selector, source, output).map(|run| run.report_path)
}

/// Run the pipeline, also returning the written document and write-back result.
pub fn sync_with_summary(
    extractor: &dyn RecordExtractor,
    gateway: &dyn VendorDirectory,
    selector: &str,
    source: &Path,
    output: &Path,
) -> Result<SyncRun, SyncError> {
    let source_records = extractor.extract(source)?;
    log::info!("{} vendors read from {}", source_records.len(), source.display());

    let remote_records = gateway.fetch(selector)?;
    log::info!("{} vendors fetched from remote directory", remote_records.len());

    let comparison = reconcile(&source_records, &remote_records);
    log::info!(
        "{} matched, {} source-only, {} conflicts",
        comparison.matched_count,
        comparison.source_only.len(),
        comparison.conflicts.len()
    );

    let document = ReportDocument::from_comparison(&comparison, Utc::now());
    let report_path = write_report(&document, output)?;

    let write_back = write_back(gateway, &comparison.source_only);

    Ok(SyncRun {
        report_path,
        document,
        write_back,
    })
}

fn write_back(gateway: &dyn VendorDirectory, source_only: &[VendorRecord]) -> WriteBack {
    if source_only.is_empty() {
        log::info!("No vendors to add.");
        return WriteBack::Skipped;
    }

    let outcomes = match gateway.submit_batch(source_only) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            log::warn!("failed to add source-only vendors to remote directory: {e}");
            return WriteBack::Failed(e.to_string());
        }
    };

    for outcome in &outcomes {
        match &outcome.status {
            SubmitStatus::Created => {
                log::debug!("vendor {} created", outcome.record_id);
            }
            SubmitStatus::AlreadyExists { message } => {
                log::warn!("vendor {} already exists remotely: {message}", outcome.record_id);
            }
            SubmitStatus::Failed { reason } => {
                log::warn!("vendor {} add failed: {reason}", outcome.record_id);
            }
        }
    }

    let summary = WriteBackSummary::tally(&outcomes);
    log::info!(
        "{} vendors added, {} already present, {} failed",
        summary.created,
        summary.already_exists,
        summary.failed
    );
    WriteBack::Completed(summary)
}
