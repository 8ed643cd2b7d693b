//! Bounded fetch pipeline
//!
//! A fixed-size pool of workers drains one shared queue of course stubs.
//! Each worker resolves its stub into a full record via the record source's
//! detail fetch, then waits out the pacing delay before taking the next
//! item. A failed fetch skips that one stub; it never aborts the pool.
//!
//! Output order is not guaranteed (workers append as they finish);
//! reconciliation downstream is keyed by id, so ordering is irrelevant.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::CourseRecord;
use crate::services::portal_client::extract_detail_fields;
use crate::types::{CourseStub, RecordSource};

/// Fetch pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum number of concurrent fetch workers
    pub worker_count: usize,
    /// Pacing delay after every detail fetch, success or failure
    pub fetch_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 3,
            fetch_delay: Duration::from_millis(900),
        }
    }
}

/// Bounded-concurrency fetch stage
pub struct FetchPipeline {
    config: PipelineConfig,
}

impl FetchPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Resolve every stub into a full course record.
    ///
    /// Spawns `min(worker_count, stubs.len())` workers over a shared queue
    /// and joins them all before returning; an empty stub list returns an
    /// empty result without spawning anything.
    pub async fn collect(
        &self,
        source: Arc<dyn RecordSource>,
        stubs: Vec<CourseStub>,
    ) -> Vec<CourseRecord> {
        if stubs.is_empty() {
            debug!("No course stubs to fetch");
            return Vec::new();
        }

        let total = stubs.len();
        let worker_count = self.config.worker_count.min(total).max(1);
        let delay = self.config.fetch_delay;

        let queue = Arc::new(Mutex::new(VecDeque::from(stubs)));
        let results: Arc<Mutex<Vec<CourseRecord>>> = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let skipped = Arc::new(AtomicUsize::new(0));

        info!(total, worker_count, "Starting detail fetch");

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let queue = queue.clone();
            let results = results.clone();
            let skipped = skipped.clone();
            let source = source.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let stub = queue.lock().await.pop_front();
                    let Some(stub) = stub else { break };

                    match source.fetch_detail(&stub.detail_url).await {
                        Ok(raw_detail) => {
                            let record = build_record(&stub, &raw_detail);
                            debug!(worker_id, id = %record.id, "Fetched course detail");
                            results.lock().await.push(record);
                        }
                        Err(e) => {
                            warn!(
                                worker_id,
                                url = %stub.detail_url,
                                error = %e,
                                "Detail fetch failed, skipping course"
                            );
                            skipped.fetch_add(1, Ordering::Relaxed);
                        }
                    }

                    // Pacing guard against overloading the portal; applies
                    // after failures too. Not a retry/backoff mechanism.
                    sleep(delay).await;
                }
                debug!(worker_id, "Fetch worker finished");
            }));
        }

        join_all(handles).await;

        let collected = {
            let mut guard = results.lock().await;
            std::mem::take(&mut *guard)
        };
        info!(
            fetched = collected.len(),
            skipped = skipped.load(Ordering::Relaxed),
            "Detail fetch complete"
        );
        collected
    }
}

/// Build a full record from a stub and its raw detail payload.
///
/// Field canonicalization and fingerprinting happen inside the record
/// constructor, so the record leaves here internally consistent.
pub fn build_record(stub: &CourseStub, raw_detail: &str) -> CourseRecord {
    let fields = extract_detail_fields(raw_detail);
    CourseRecord::new(
        resolve_course_id(stub),
        &stub.title,
        &stub.instructor,
        &stub.term,
        &stub.schedule,
        fields.room.as_deref(),
        fields.updated_label.as_deref(),
        &fields.body_text,
        &stub.detail_url,
    )
}

/// Resolve the final record identifier for a stub.
///
/// Priority: non-empty stub id, then the `id` query parameter of the detail
/// locator, then the raw locator string itself.
pub fn resolve_course_id(stub: &CourseStub) -> String {
    if let Some(id) = &stub.id {
        let id = id.trim();
        if !id.is_empty() {
            return id.to_string();
        }
    }

    if let Ok(url) = Url::parse(&stub.detail_url) {
        if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "id") {
            if !value.is_empty() {
                return value.into_owned();
            }
        }
    }

    stub.detail_url.clone()
}
