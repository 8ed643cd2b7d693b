//! Change-detection workflow: bounded fetch pipeline and reconciliation

pub mod pipeline;
pub mod reconciler;

pub use pipeline::{FetchPipeline, PipelineConfig};
pub use reconciler::reconcile;
