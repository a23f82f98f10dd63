use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Where a vendor record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Spreadsheet,
    Remote,
}

/// A single normalized vendor from either side.
///
/// `record_id` is the comparison key and the only field equality looks at;
/// `origin` is metadata.
#[derive(Debug, Clone, Serialize)]
pub struct VendorRecord {
    record_id: String,
    name: String,
    origin: Origin,
}

impl VendorRecord {
    pub fn new(record_id: impl Into<String>, name: impl Into<String>, origin: Origin) -> Self {
        Self {
            record_id: record_id.into(),
            name: name.into(),
            origin,
        }
    }

    pub fn spreadsheet(record_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(record_id, name, Origin::Spreadsheet)
    }

    pub fn remote(record_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(record_id, name, Origin::Remote)
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl PartialEq for VendorRecord {
    fn eq(&self, other: &Self) -> bool {
        self.record_id == other.record_id
    }
}

impl Eq for VendorRecord {}

impl Hash for VendorRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.record_id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// Same id on both sides, different name.
    DataMismatch,
    /// Present remotely, absent from the spreadsheet.
    MissingInSource,
}

/// A discrepancy between the two sides.
///
/// Built only by the engine, through [`Conflict::data_mismatch`] and
/// [`Conflict::missing_in_source`], which pin down which names are present
/// and that mismatched names differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    record_id: String,
    source_name: Option<String>,
    remote_name: Option<String>,
    reason: ConflictReason,
}

impl Conflict {
    pub(crate) fn data_mismatch(
        record_id: impl Into<String>,
        source_name: impl Into<String>,
        remote_name: impl Into<String>,
    ) -> Self {
        let source_name = source_name.into();
        let remote_name = remote_name.into();
        debug_assert_ne!(source_name, remote_name, "data_mismatch with equal names");
        Self {
            record_id: record_id.into(),
            source_name: Some(source_name),
            remote_name: Some(remote_name),
            reason: ConflictReason::DataMismatch,
        }
    }

    pub(crate) fn missing_in_source(record_id: impl Into<String>, remote_name: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            source_name: None,
            remote_name: Some(remote_name.into()),
            reason: ConflictReason::MissingInSource,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn remote_name(&self) -> Option<&str> {
        self.remote_name.as_deref()
    }

    pub fn reason(&self) -> ConflictReason {
        self.reason
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Result of one reconciliation run. Never mutated after [`crate::reconcile`]
/// returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonReport {
    /// Present only in the spreadsheet; candidates for remote creation.
    pub source_only: Vec<VendorRecord>,
    /// Present only remotely. Each also has a `missing_in_source` conflict.
    pub remote_only: Vec<VendorRecord>,
    /// Mismatches first, then missing-in-source entries.
    pub conflicts: Vec<Conflict>,
    /// Same id and same name on both sides.
    pub matched_count: usize,
}

impl ComparisonReport {
    #[cfg(test)]
    pub(crate) fn mismatch_count(&self) -> usize {
        self.conflicts
            .iter()
            .filter(|c| c.reason == ConflictReason::DataMismatch)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Write-back
// ---------------------------------------------------------------------------

/// Per-record result of a remote creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Created,
    /// Duplicate key on the remote side. Expected, non-fatal.
    AlreadyExists { message: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub record_id: String,
    pub status: SubmitStatus,
}

impl SubmitOutcome {
    pub fn new(record_id: impl Into<String>, status: SubmitStatus) -> Self {
        Self {
            record_id: record_id.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteBackSummary {
    pub created: usize,
    pub already_exists: usize,
    pub failed: usize,
}

impl WriteBackSummary {
    pub fn tally(outcomes: &[SubmitOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                SubmitStatus::Created => summary.created += 1,
                SubmitStatus::AlreadyExists { .. } => summary.already_exists += 1,
                SubmitStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}
