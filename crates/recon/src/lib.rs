//! `vendorsync-recon` — vendor reconciliation engine.
//!
//! The engine is pure: it receives pre-loaded records and returns a
//! classified comparison. Report persistence and the sync pipeline sit on
//! top of it; extraction and the remote directory are supplied through the
//! [`RecordExtractor`] and [`VendorDirectory`] traits.

pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod report;
pub mod sync;

pub use engine::reconcile;
pub use error::SyncError;
pub use model::{
    ComparisonReport, Conflict, ConflictReason, Origin, SubmitOutcome, SubmitStatus, VendorRecord,
    WriteBackSummary,
};
pub use report::{read_report, write_report, ReportDocument};
pub use sync::{sync, sync_with_summary, RecordExtractor, SyncRun, VendorDirectory, WriteBack};
