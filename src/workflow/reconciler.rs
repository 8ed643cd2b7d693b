//! Snapshot reconciliation
//!
//! Classifies every course id into exactly one of added, changed, removed,
//! or unchanged. Fingerprint equality is the sole change signal; fields are
//! never compared individually. Neither input snapshot is mutated.

use crate::models::{ChangedCourse, DiffResult, Snapshot};

/// Diff the current snapshot against the previous one.
///
/// Output lists are sorted by id so downstream reporting is deterministic
/// regardless of fetch completion order.
pub fn reconcile(previous: &Snapshot, current: &Snapshot) -> DiffResult {
    let mut diff = DiffResult::default();

    for record in current.records() {
        match previous.get(&record.id) {
            None => diff.added.push(record.clone()),
            Some(prev) if prev.hash != record.hash => diff.changed.push(ChangedCourse {
                before: prev.clone(),
                after: record.clone(),
            }),
            Some(_) => {}
        }
    }

    for record in previous.records() {
        if !current.contains(&record.id) {
            diff.removed.push(record.clone());
        }
    }

    diff.added.sort_by(|a, b| a.id.cmp(&b.id));
    diff.changed.sort_by(|a, b| a.after.id.cmp(&b.after.id));
    diff.removed.sort_by(|a, b| a.id.cmp(&b.id));
    diff
}
