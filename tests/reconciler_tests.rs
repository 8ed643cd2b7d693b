//! Reconciliation properties and worked examples

use coursewatch::models::{CourseRecord, Snapshot};
use coursewatch::workflow::reconcile;

fn record(id: &str, body: &str) -> CourseRecord {
    CourseRecord::new(
        id.to_string(),
        &format!("Course {id}"),
        "Instructor",
        "2026 Spring",
        "Mon 2",
        Some("B-12"),
        None,
        body,
        &format!("https://portal.example/course?id={id}"),
    )
}

#[test]
fn test_identical_snapshots_yield_empty_diff() {
    let previous = Snapshot::from_records(vec![record("C1", "a"), record("C2", "b")]);
    let current = Snapshot::from_records(vec![record("C1", "a"), record("C2", "b")]);

    let diff = reconcile(&previous, &current);
    assert!(diff.is_empty());
}

#[test]
fn test_addition_only() {
    // previous = {C1}, current = {C1, C2} => added = [C2]
    let previous = Snapshot::from_records(vec![record("C1", "a")]);
    let current = Snapshot::from_records(vec![record("C1", "a"), record("C2", "b")]);

    let diff = reconcile(&previous, &current);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].id, "C2");
    assert!(diff.changed.is_empty());
    assert!(diff.removed.is_empty());
}

#[test]
fn test_content_change_carries_both_versions() {
    // previous = {C1 with hash a}, current = {C1 with hash z} => changed
    let previous = Snapshot::from_records(vec![record("C1", "original body")]);
    let current = Snapshot::from_records(vec![record("C1", "revised body")]);

    let diff = reconcile(&previous, &current);
    assert!(diff.added.is_empty());
    assert!(diff.removed.is_empty());
    assert_eq!(diff.changed.len(), 1);
    assert_eq!(diff.changed[0].before.body_text, "original body");
    assert_eq!(diff.changed[0].after.body_text, "revised body");
    assert_ne!(diff.changed[0].before.hash, diff.changed[0].after.hash);
}

#[test]
fn test_removal_only() {
    // previous = {C1}, current = {} => removed = [C1]
    let previous = Snapshot::from_records(vec![record("C1", "a")]);
    let current = Snapshot::default();

    let diff = reconcile(&previous, &current);
    assert!(diff.added.is_empty());
    assert!(diff.changed.is_empty());
    assert_eq!(diff.removed.len(), 1);
    assert_eq!(diff.removed[0].id, "C1");
}

#[test]
fn test_both_snapshots_empty() {
    assert!(reconcile(&Snapshot::default(), &Snapshot::default()).is_empty());
}

#[test]
fn test_every_id_classified_exactly_once() {
    // previous: C1..C4; current: C3 changed, C4 unchanged, C5/C6 new
    let previous = Snapshot::from_records(vec![
        record("C1", "a"),
        record("C2", "b"),
        record("C3", "c"),
        record("C4", "d"),
    ]);
    let current = Snapshot::from_records(vec![
        record("C3", "c revised"),
        record("C4", "d"),
        record("C5", "e"),
        record("C6", "f"),
    ]);

    let diff = reconcile(&previous, &current);
    let unchanged = current.len() - diff.added.len() - diff.changed.len();

    assert_eq!(
        diff.added.len() + diff.changed.len() + unchanged,
        current.len()
    );
    assert_eq!(
        diff.removed.len() + diff.changed.len() + unchanged,
        previous.len()
    );

    assert_eq!(diff.added.len(), 2);
    assert_eq!(diff.changed.len(), 1);
    assert_eq!(diff.removed.len(), 2);
    assert_eq!(unchanged, 1);
}

#[test]
fn test_output_lists_sorted_by_id() {
    let previous = Snapshot::from_records(vec![record("R2", "x"), record("R1", "x")]);
    let current = Snapshot::from_records(vec![
        record("A3", "x"),
        record("A1", "x"),
        record("A2", "x"),
    ]);

    let diff = reconcile(&previous, &current);
    let added_ids: Vec<&str> = diff.added.iter().map(|r| r.id.as_str()).collect();
    let removed_ids: Vec<&str> = diff.removed.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(added_ids, vec!["A1", "A2", "A3"]);
    assert_eq!(removed_ids, vec!["R1", "R2"]);
}
