//! Full watch-cycle test: pipeline output persisted, reloaded, and
//! reconciled across simulated runs

use std::sync::Arc;
use std::time::Duration;

use coursewatch::error::Result;
use coursewatch::models::Snapshot;
use coursewatch::services::snapshot_store;
use coursewatch::types::{CourseStub, RecordSource};
use coursewatch::workflow::{reconcile, FetchPipeline, PipelineConfig};

/// Source that serves a fixed catalog, with one course body varying per
/// construction to simulate portal-side edits between runs.
struct FixedSource {
    body_of_c2: String,
}

#[async_trait::async_trait]
impl RecordSource for FixedSource {
    async fn list_stubs(&self) -> Result<Vec<CourseStub>> {
        Ok(vec![
            CourseStub {
                id: Some("C1".to_string()),
                title: "Algorithms".to_string(),
                detail_url: "https://portal.example/course?id=C1".to_string(),
                instructor: "Prof. Knuth".to_string(),
                term: "2026 Spring".to_string(),
                schedule: "Mon 3".to_string(),
            },
            CourseStub {
                id: Some("C2".to_string()),
                title: "Databases".to_string(),
                detail_url: "https://portal.example/course?id=C2".to_string(),
                instructor: "Prof. Codd".to_string(),
                term: "2026 Spring".to_string(),
                schedule: "Wed 2".to_string(),
            },
        ])
    }

    async fn fetch_detail(&self, detail_url: &str) -> Result<String> {
        let body = if detail_url.ends_with("C2") {
            self.body_of_c2.clone()
        } else {
            "Syllabus for C1".to_string()
        };
        Ok(format!("<div class=\"course-body\">{body}</div>"))
    }
}

async fn run_once(source: Arc<dyn RecordSource>, snapshot_path: &std::path::Path) -> Snapshot {
    let stubs = source.list_stubs().await.unwrap();
    let pipeline = FetchPipeline::new(PipelineConfig {
        worker_count: 3,
        fetch_delay: Duration::ZERO,
    });
    let records = pipeline.collect(source, stubs).await;
    let current = Snapshot::from_records(records);
    snapshot_store::save(snapshot_path, &current.sorted_records()).unwrap();
    current
}

#[tokio::test]
async fn test_repeat_run_with_unchanged_portal_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courses.json");

    let source = Arc::new(FixedSource {
        body_of_c2: "Syllabus for C2".to_string(),
    });

    // First run: everything is new.
    let previous = snapshot_store::load(&path);
    assert!(previous.is_empty());
    let first = run_once(source.clone(), &path).await;
    let diff = reconcile(&previous, &first);
    assert_eq!(diff.added.len(), 2);

    // Second run against the persisted snapshot: hashes must be stable
    // across the save/load boundary, so nothing registers as a change.
    let reloaded = snapshot_store::load(&path);
    let second = run_once(source, &path).await;
    assert!(reconcile(&reloaded, &second).is_empty());
}

#[tokio::test]
async fn test_portal_edit_is_detected_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("courses.json");

    let original = Arc::new(FixedSource {
        body_of_c2: "Week 1: relational model".to_string(),
    });
    run_once(original, &path).await;

    let edited = Arc::new(FixedSource {
        body_of_c2: "Week 1: relational model. Week 2: SQL.".to_string(),
    });
    let previous = snapshot_store::load(&path);
    let current = run_once(edited, &path).await;

    let diff = reconcile(&previous, &current);
    assert!(diff.added.is_empty());
    assert!(diff.removed.is_empty());
    assert_eq!(diff.changed.len(), 1);
    assert_eq!(diff.changed[0].after.id, "C2");
}
