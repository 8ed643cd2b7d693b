//! Change notification sinks
//!
//! The pipeline hands the finished diff to exactly one notifier, selected by
//! configuration: a webhook poster when a webhook URL is configured, or the
//! log-only notifier otherwise. Delivery failure is reported to the caller
//! but is never fatal to the run.

use std::time::Duration;

use serde_json::json;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::DiffResult;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Enumeration caps keep the chat message bounded however large the diff is.
const MAX_ADDED_LINES: usize = 10;
const MAX_CHANGED_LINES: usize = 10;
const MAX_REMOVED_LINES: usize = 5;

/// Capability interface of the notification collaborator
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, diff: &DiffResult) -> Result<()>;
}

/// Posts the diff summary as a JSON `{"text": ...}` payload to a webhook
pub struct WebhookNotifier {
    http: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            webhook_url: webhook_url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, diff: &DiffResult) -> Result<()> {
        let text = format_summary(diff);
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Notify(format!(
                "Webhook returned status {}",
                response.status()
            )));
        }

        info!(entries = diff.total(), "Posted change notification");
        Ok(())
    }
}

/// Fallback notifier that writes the summary to the log
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, diff: &DiffResult) -> Result<()> {
        for line in format_summary(diff).lines() {
            info!("{}", line);
        }
        Ok(())
    }
}

/// Render the bounded, human-readable diff summary.
///
/// At most the first 10 added, 10 changed, and 5 removed courses are
/// enumerated, with an overflow line per category; an empty diff gets its
/// own distinct message.
pub fn format_summary(diff: &DiffResult) -> String {
    if diff.is_empty() {
        return "Course catalog check: no changes detected.".to_string();
    }

    let mut out = format!(
        "Course catalog changes: {} added, {} changed, {} removed",
        diff.added.len(),
        diff.changed.len(),
        diff.removed.len()
    );

    push_section(
        &mut out,
        "Added",
        diff.added.iter().map(|r| format!("[{}] {}", r.id, r.title)),
        diff.added.len(),
        MAX_ADDED_LINES,
    );
    push_section(
        &mut out,
        "Changed",
        diff.changed
            .iter()
            .map(|c| format!("[{}] {}", c.after.id, c.after.title)),
        diff.changed.len(),
        MAX_CHANGED_LINES,
    );
    push_section(
        &mut out,
        "Removed",
        diff.removed.iter().map(|r| format!("[{}] {}", r.id, r.title)),
        diff.removed.len(),
        MAX_REMOVED_LINES,
    );

    out
}

fn push_section(
    out: &mut String,
    heading: &str,
    lines: impl Iterator<Item = String>,
    total: usize,
    cap: usize,
) {
    if total == 0 {
        return;
    }
    out.push_str(&format!("\n\n{heading}:"));
    for line in lines.take(cap) {
        out.push_str(&format!("\n- {line}"));
    }
    if total > cap {
        out.push_str(&format!("\n- ... and {} more", total - cap));
    }
}
