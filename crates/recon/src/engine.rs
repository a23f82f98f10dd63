use crate::matcher::match_by_id;
use crate::model::{ComparisonReport, Conflict, VendorRecord};

/// Reconcile spreadsheet records against remote records.
///
/// Pure: no I/O and no failure mode. Output ordering is by `record_id`, with
/// all `data_mismatch` conflicts ahead of `missing_in_source` ones.
pub fn reconcile(source: &[VendorRecord], remote: &[VendorRecord]) -> ComparisonReport {
    let partition = match_by_id(source, remote);

    let mut report = ComparisonReport::default();

    // Same id: exact name comparison, no case or whitespace folding
    for (source_rec, remote_rec) in &partition.shared {
        if source_rec.name() == remote_rec.name() {
            report.matched_count += 1;
        } else {
            report.conflicts.push(Conflict::data_mismatch(
                source_rec.record_id(),
                source_rec.name(),
                remote_rec.name(),
            ));
        }
    }

    // Source-only records are additions, not discrepancies
    report.source_only = partition.source_only.into_iter().cloned().collect();

    for remote_rec in partition.remote_only {
        report
            .conflicts
            .push(Conflict::missing_in_source(remote_rec.record_id(), remote_rec.name()));
        report.remote_only.push(remote_rec.clone());
    }

    report
}
