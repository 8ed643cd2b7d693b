//! Data model: course records, snapshots, and diff results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::services::canonicalizer::canonicalize;
use crate::services::fingerprinter::fingerprint;

/// One harvested course, as persisted in the snapshot file.
///
/// `hash` is a pure function of the other content fields (see
/// [`fingerprint`]) and is only ever produced together with them via
/// [`CourseRecord::new`]. `detail_url` does not participate in the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// Stable external identifier, unique within one snapshot
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub term: String,
    /// Day/period slot, e.g. "Mon 3"
    #[serde(rename = "dayPeriod")]
    pub schedule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Free-text "last updated" label from the detail page
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Normalized detail-page content; dominant contributor to the hash
    pub body_text: String,
    /// Canonical locator of the detail page this record came from
    pub detail_url: String,
    /// Content fingerprint, lowercase hex SHA-256
    pub hash: String,
}

impl CourseRecord {
    /// Build a record from raw field values.
    ///
    /// Every textual field is canonicalized before it is stored or hashed,
    /// so incidental whitespace noise in the portal never registers as a
    /// change. An empty optional field is treated as absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        title: &str,
        instructor: &str,
        term: &str,
        schedule: &str,
        room: Option<&str>,
        updated_at: Option<&str>,
        body_text: &str,
        detail_url: &str,
    ) -> Self {
        let title = canonicalize(title);
        let instructor = canonicalize(instructor);
        let term = canonicalize(term);
        let schedule = canonicalize(schedule);
        let room = room.map(canonicalize).filter(|s| !s.is_empty());
        let updated_at = updated_at.map(canonicalize).filter(|s| !s.is_empty());
        let body_text = canonicalize(body_text);

        let hash = fingerprint(
            &title,
            &instructor,
            &term,
            &schedule,
            room.as_deref(),
            updated_at.as_deref(),
            &body_text,
        );

        Self {
            id,
            title,
            instructor,
            term,
            schedule,
            room,
            updated_at,
            body_text,
            detail_url: detail_url.trim().to_string(),
            hash,
        }
    }
}

/// The complete keyed record set observed at one pipeline run.
///
/// Built once from pipeline output (or a persisted file) and read-only
/// afterwards.
#[derive(Debug, Default)]
pub struct Snapshot {
    records: HashMap<String, CourseRecord>,
}

impl Snapshot {
    /// Build a snapshot from a record list, keyed by id.
    ///
    /// Duplicate ids are last-write-wins; a collision is logged so a
    /// misbehaving portal is visible.
    pub fn from_records(records: Vec<CourseRecord>) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(previous) = map.insert(record.id.clone(), record) {
                warn!(id = %previous.id, "Duplicate course id in snapshot, keeping the later record");
            }
        }
        Self { records: map }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CourseRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Iterate over records in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &CourseRecord> {
        self.records.values()
    }

    /// Clone out all records, sorted by id for deterministic output.
    pub fn sorted_records(&self) -> Vec<CourseRecord> {
        let mut records: Vec<CourseRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }
}

/// A course present in both snapshots whose fingerprint changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedCourse {
    pub before: CourseRecord,
    pub after: CourseRecord,
}

/// Three-way classification of one reconciliation pass.
///
/// Derived, consumed by reporting, never persisted. Lists are sorted by id.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub added: Vec<CourseRecord>,
    pub changed: Vec<ChangedCourse>,
    pub removed: Vec<CourseRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Total number of diff entries across all categories
    pub fn total(&self) -> usize {
        self.added.len() + self.changed.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, body: &str) -> CourseRecord {
        CourseRecord::new(
            id.to_string(),
            "Algorithms",
            "Prof. Knuth",
            "2026 Spring",
            "Mon 3",
            Some("A-301"),
            Some("2026-04-01"),
            body,
            "https://portal.example/course?id=C1",
        )
    }

    #[test]
    fn test_new_canonicalizes_fields() {
        let r = CourseRecord::new(
            "C1".to_string(),
            "  Algorithms\n and   Data Structures ",
            "Prof.\u{00A0}Knuth",
            "2026\nSpring",
            " Mon  3 ",
            Some("  "),
            None,
            "line one\n\nline two",
            " https://portal.example/course?id=C1 ",
        );
        assert_eq!(r.title, "Algorithms and Data Structures");
        assert_eq!(r.instructor, "Prof. Knuth");
        assert_eq!(r.term, "2026 Spring");
        assert_eq!(r.schedule, "Mon 3");
        assert_eq!(r.room, None); // whitespace-only collapses to absent
        assert_eq!(r.body_text, "line one line two");
        assert_eq!(r.detail_url, "https://portal.example/course?id=C1");
        assert_eq!(r.hash.len(), 64);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(record("C1", "body")).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "id",
            "title",
            "instructor",
            "term",
            "dayPeriod",
            "room",
            "updatedAt",
            "bodyText",
            "detailUrl",
            "hash",
        ] {
            assert!(obj.contains_key(key), "missing wire field {key}");
        }
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let r = CourseRecord::new(
            "C1".to_string(),
            "t",
            "i",
            "term",
            "s",
            None,
            None,
            "b",
            "u",
        );
        let json = serde_json::to_value(&r).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("room"));
        assert!(!obj.contains_key("updatedAt"));
    }

    #[test]
    fn test_snapshot_duplicate_id_last_write_wins() {
        let first = record("C1", "old body");
        let second = record("C1", "new body");
        let expected_hash = second.hash.clone();

        let snapshot = Snapshot::from_records(vec![first, second]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("C1").unwrap().hash, expected_hash);
    }

    #[test]
    fn test_sorted_records_order() {
        let snapshot =
            Snapshot::from_records(vec![record("C3", "x"), record("C1", "x"), record("C2", "x")]);
        let records = snapshot.sorted_records();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3"]);
    }
}
