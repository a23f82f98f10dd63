use std::collections::BTreeSet;
use std::path::Path;

use proptest::prelude::*;
use vendorsync_recon::report::{AddedVendor, ConflictEntry};
use vendorsync_recon::{
    read_report, reconcile, sync, write_report, ComparisonReport, ConflictReason, RecordExtractor,
    ReportDocument, SubmitOutcome, SubmitStatus, SyncError, VendorDirectory, VendorRecord,
};

struct Source(Vec<VendorRecord>);

impl RecordExtractor for Source {
    fn extract(&self, _source: &Path) -> Result<Vec<VendorRecord>, SyncError> {
        Ok(self.0.clone())
    }
}

/// Remote side that reports every submitted vendor as a duplicate.
struct DuplicateRejectingDirectory(Vec<VendorRecord>);

impl VendorDirectory for DuplicateRejectingDirectory {
    fn fetch(&self, _selector: &str) -> Result<Vec<VendorRecord>, SyncError> {
        Ok(self.0.clone())
    }

    fn submit_batch(&self, records: &[VendorRecord]) -> Result<Vec<SubmitOutcome>, SyncError> {
        Ok(records
            .iter()
            .map(|r| {
                SubmitOutcome::new(
                    r.record_id(),
                    SubmitStatus::AlreadyExists {
                        message: format!("The name \"{}\" of the list element is already in use.", r.name()),
                    },
                )
            })
            .collect())
    }
}

struct UnreachableDirectory;

impl VendorDirectory for UnreachableDirectory {
    fn fetch(&self, _selector: &str) -> Result<Vec<VendorRecord>, SyncError> {
        Err(SyncError::Gateway("could not start session".into()))
    }

    fn submit_batch(&self, _records: &[VendorRecord]) -> Result<Vec<SubmitOutcome>, SyncError> {
        panic!("submit_batch must not be reached when fetch fails");
    }
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

fn run_scenario(source: Vec<VendorRecord>, remote: Vec<VendorRecord>) -> ReportDocument {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("comparison_report.json");
    let path = sync(
        &Source(source),
        &DuplicateRejectingDirectory(remote),
        "",
        Path::new("company_data.xlsx"),
        &output,
    )
    .unwrap();
    read_report(&path).unwrap()
}

#[test]
fn scenario_a_source_only_vendor_is_added() {
    let doc = run_scenario(vec![VendorRecord::spreadsheet("30", "Acme")], vec![]);

    assert_eq!(doc.status, "success");
    assert_eq!(doc.same_vendors, 0);
    assert_eq!(
        doc.added_vendors,
        vec![AddedVendor { record_id: "30".into(), name: "Acme".into() }]
    );
    assert!(doc.conflicts.is_empty());
    assert_eq!(doc.error, None);
}

#[test]
fn scenario_b_name_mismatch() {
    let doc = run_scenario(
        vec![VendorRecord::spreadsheet("30", "Acme")],
        vec![VendorRecord::remote("30", "ACME Corp")],
    );

    assert_eq!(doc.same_vendors, 0);
    assert!(doc.added_vendors.is_empty());
    assert_eq!(
        doc.conflicts,
        vec![ConflictEntry {
            record_id: "30".into(),
            reason: ConflictReason::DataMismatch,
            excel_name: Some("Acme".into()),
            qb_name: Some("ACME Corp".into()),
        }]
    );
}

#[test]
fn scenario_c_remote_only_vendor() {
    let remote = vec![VendorRecord::remote("55", "Beta")];
    let report = reconcile(&[], &remote);
    assert_eq!(report.remote_only.len(), 1);
    assert_eq!(report.remote_only[0].name(), "Beta");

    let doc = run_scenario(vec![], remote);
    assert_eq!(doc.same_vendors, 0);
    assert!(doc.added_vendors.is_empty());
    assert_eq!(
        doc.conflicts,
        vec![ConflictEntry {
            record_id: "55".into(),
            reason: ConflictReason::MissingInSource,
            excel_name: None,
            qb_name: Some("Beta".into()),
        }]
    );
}

#[test]
fn scenario_d_already_exists_is_non_fatal() {
    testing_logger::setup();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/comparison_report.json");
    let path = sync(
        &Source(vec![VendorRecord::spreadsheet("30", "Acme")]),
        &DuplicateRejectingDirectory(vec![]),
        "",
        Path::new("company_data.xlsx"),
        &output,
    )
    .unwrap();

    assert_eq!(path, output);
    let doc = read_report(&path).unwrap();
    assert_eq!(doc.status, "success");
    assert_eq!(doc.added_vendors.len(), 1);

    testing_logger::validate(|logs| {
        assert!(logs
            .iter()
            .any(|l| l.level == log::Level::Warn && l.body.contains("already exists")));
    });
}

#[test]
fn fetch_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("comparison_report.json");
    let err = sync(
        &Source(vec![VendorRecord::spreadsheet("30", "Acme")]),
        &UnreachableDirectory,
        "",
        Path::new("company_data.xlsx"),
        &output,
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::Gateway(_)));
    assert!(!output.exists());
}

// -------------------------------------------------------------------------
// Round trip
// -------------------------------------------------------------------------

#[test]
fn document_round_trip_recovers_comparison() {
    let source = vec![
        VendorRecord::spreadsheet("1", "Acme"),
        VendorRecord::spreadsheet("2", "Beta"),
        VendorRecord::spreadsheet("3", "Gamma & Sons <West>"),
    ];
    let remote = vec![
        VendorRecord::remote("1", "Acme"),
        VendorRecord::remote("2", "Beta LLC"),
        VendorRecord::remote("4", "Delta"),
    ];
    let report = reconcile(&source, &remote);
    let doc = ReportDocument::from_comparison(&report, chrono::Utc::now());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&doc, &path).unwrap();
    let back = read_report(&path).unwrap();

    assert_eq!(back.same_vendors, report.matched_count);
    let added: Vec<_> = back.added_vendors.iter().map(|v| (v.record_id.as_str(), v.name.as_str())).collect();
    assert_eq!(added, [("3", "Gamma & Sons <West>")]);
    assert_eq!(back.conflicts.len(), report.conflicts.len());
    for (entry, conflict) in back.conflicts.iter().zip(&report.conflicts) {
        assert_eq!(entry.record_id, conflict.record_id());
        assert_eq!(entry.reason, conflict.reason());
        assert_eq!(entry.excel_name.as_deref(), conflict.source_name());
        assert_eq!(entry.qb_name.as_deref(), conflict.remote_name());
    }
}

// -------------------------------------------------------------------------
// Properties
// -------------------------------------------------------------------------

fn names() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Acme", "acme", "Beta", "Beta ", "Gamma"]).prop_map(str::to_string)
}

/// Unique ids drawn from `range`, each with a name.
fn records(range: std::ops::Range<u32>, remote: bool) -> impl Strategy<Value = Vec<VendorRecord>> {
    prop::collection::btree_map(range, names(), 0..20).prop_map(move |m| {
        m.into_iter()
            .map(|(id, name)| {
                if remote {
                    VendorRecord::remote(id.to_string(), name)
                } else {
                    VendorRecord::spreadsheet(id.to_string(), name)
                }
            })
            .collect()
    })
}

fn mismatches(report: &ComparisonReport) -> usize {
    report
        .conflicts
        .iter()
        .filter(|c| c.reason() == ConflictReason::DataMismatch)
        .count()
}

fn named(records: &[VendorRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|r| (r.record_id().to_string(), r.name().to_string()))
        .collect()
}

fn ids(records: &[VendorRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.record_id().to_string()).collect()
}

proptest! {
    #[test]
    fn disjoint_inputs_have_no_matches(
        source in records(0..100, false),
        remote in records(100..200, true),
    ) {
        let report = reconcile(&source, &remote);
        prop_assert_eq!(report.matched_count, 0);
        prop_assert_eq!(report.conflicts.len(), remote.len());
        prop_assert!(report.conflicts.iter().all(|c| c.reason() == ConflictReason::MissingInSource));
        prop_assert_eq!(ids(&report.source_only), ids(&source));
        prop_assert_eq!(ids(&report.remote_only), ids(&remote));
    }

    #[test]
    fn equal_names_on_shared_ids_all_match(source in records(0..50, false)) {
        let remote: Vec<_> = source
            .iter()
            .map(|r| VendorRecord::remote(r.record_id(), r.name()))
            .collect();
        let report = reconcile(&source, &remote);
        prop_assert_eq!(report.matched_count, source.len());
        prop_assert!(report.conflicts.is_empty());
    }

    #[test]
    fn every_id_has_exactly_one_outcome(
        source in records(0..60, false),
        remote in records(30..90, true),
    ) {
        let report = reconcile(&source, &remote);
        let shared = ids(&source).intersection(&ids(&remote)).count();
        prop_assert_eq!(report.matched_count + mismatches(&report), shared);
        prop_assert_eq!(
            report.conflicts.len() - mismatches(&report),
            report.remote_only.len()
        );
    }

    #[test]
    fn input_order_does_not_change_output(
        source in records(0..60, false),
        remote in records(30..90, true),
    ) {
        let forward = reconcile(&source, &remote);
        let mut source_rev = source.clone();
        source_rev.reverse();
        let mut remote_rev = remote.clone();
        remote_rev.reverse();
        let backward = reconcile(&source_rev, &remote_rev);
        prop_assert_eq!(named(&forward.source_only), named(&backward.source_only));
        prop_assert_eq!(named(&forward.remote_only), named(&backward.remote_only));
        prop_assert_eq!(forward, backward);
    }
}
