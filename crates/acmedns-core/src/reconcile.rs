//! Record set reconciliation
//!
//! The registrar only offers a full-replace write, so updates are computed in
//! memory over the fetched record set. Both functions here are pure.

use crate::record::{DnsRecord, RecordSet, RecordType};

/// Remove every record with the given (name, type) identity
///
/// Returns the remaining records, in their relative order, and the removed
/// ones.
pub fn remove_matching(
    existing: RecordSet,
    name: &str,
    record_type: &RecordType,
) -> (RecordSet, Vec<DnsRecord>) {
    existing
        .into_iter()
        .partition(|record| !record.matches(name, record_type))
}

/// Remove the records equal to `target` in name, type and content
///
/// Used to retract a published challenge without touching a newer token that
/// another invocation may have published under the same name since.
pub fn remove_exact(existing: RecordSet, target: &DnsRecord) -> (RecordSet, Vec<DnsRecord>) {
    existing.into_iter().partition(|record| {
        !(record.matches(&target.name, &target.record_type) && record.content == target.content)
    })
}

/// Replace-or-append `candidate` into `existing`
///
/// Any record sharing the candidate's (name, type) is dropped and the
/// candidate is appended at the end. The result holds exactly one such record.
/// Running it again with the same candidate yields the same set.
///
/// If the registrar returned duplicates for the identity, all of them are
/// dropped.
pub fn reconcile(existing: RecordSet, candidate: DnsRecord) -> RecordSet {
    let (mut records, removed) =
        remove_matching(existing, &candidate.name, &candidate.record_type);

    match removed.len() {
        0 => {}
        1 => tracing::info!("Removing old challenge entry"),
        n => tracing::warn!(
            name = %candidate.name,
            record_type = %candidate.record_type,
            count = n,
            "Removing duplicate challenge entries"
        ),
    }

    records.push(candidate);
    records
}
