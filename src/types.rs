//! Base types and trait seams for the fetch pipeline
//!
//! The portal itself (login, pagination, DOM shape) sits behind the
//! [`RecordSource`] trait so the pipeline can be exercised against mock
//! sources in tests.

use crate::error::Result;

/// Minimal list-page reference to one course, prior to detail enrichment.
///
/// All fields are untrusted free text straight from the list page; the
/// pipeline canonicalizes them when it builds the full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseStub {
    /// Identifier candidate from the list row; may be absent, in which case
    /// the pipeline derives an id from the detail locator
    pub id: Option<String>,
    pub title: String,
    /// Absolute locator of the course detail page
    pub detail_url: String,
    pub instructor: String,
    pub term: String,
    pub schedule: String,
}

/// Capability interface of the record source collaborator.
///
/// `list_stubs` may legitimately return an empty list; `fetch_detail` may
/// fail per call, which the pipeline treats as "skip this record".
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Enumerate all course stubs visible on the portal list pages
    async fn list_stubs(&self) -> Result<Vec<CourseStub>>;

    /// Fetch the raw detail page for one course locator
    async fn fetch_detail(&self, detail_url: &str) -> Result<String>;
}
