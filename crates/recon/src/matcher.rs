use std::collections::BTreeMap;

use crate::model::VendorRecord;

/// Records split into shared / one-sided buckets by `record_id`.
///
/// Every vector is ordered by `record_id`.
#[derive(Debug)]
pub struct IdPartition<'a> {
    pub shared: Vec<(&'a VendorRecord, &'a VendorRecord)>,
    pub source_only: Vec<&'a VendorRecord>,
    pub remote_only: Vec<&'a VendorRecord>,
}

/// Index records by id. A later record with the same id replaces an earlier one.
pub fn index_by_id(records: &[VendorRecord]) -> BTreeMap<&str, &VendorRecord> {
    records.iter().map(|r| (r.record_id(), r)).collect()
}

/// Match two record sets by exact `record_id`.
pub fn match_by_id<'a>(source: &'a [VendorRecord], remote: &'a [VendorRecord]) -> IdPartition<'a> {
    let source_map = index_by_id(source);
    let remote_map = index_by_id(remote);

    let mut shared = Vec::new();
    let mut source_only = Vec::new();
    let mut remote_only = Vec::new();

    for (id, source_rec) in &source_map {
        if let Some(remote_rec) = remote_map.get(id) {
            shared.push((*source_rec, *remote_rec));
        } else {
            source_only.push(*source_rec);
        }
    }

    for (id, remote_rec) in &remote_map {
        if !source_map.contains_key(id) {
            remote_only.push(*remote_rec);
        }
    }

    IdPartition {
        shared,
        source_only,
        remote_only,
    }
}
