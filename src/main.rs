//! coursewatch - course portal change watcher
//!
//! One invocation performs one full watch cycle: load the previous
//! snapshot, harvest the current catalog through the bounded fetch
//! pipeline, reconcile, persist, report, notify.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use coursewatch::config::{Cli, Config};
use coursewatch::models::Snapshot;
use coursewatch::services::notifier::{LogNotifier, Notifier, WebhookNotifier};
use coursewatch::services::portal_client::PortalClient;
use coursewatch::services::{report, snapshot_store};
use coursewatch::types::RecordSource;
use coursewatch::workflow::{reconcile, FetchPipeline, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting coursewatch v{}", env!("CARGO_PKG_VERSION"));

    // A configuration error aborts here, before any network activity.
    let cli = Cli::parse();
    let config = Config::resolve(cli)?;

    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let started = Instant::now();

    let previous = snapshot_store::load(&config.snapshot_path);

    let client = PortalClient::new(
        &config.portal_url,
        &config.portal_user,
        &config.portal_password,
    )?;
    client.login().await?;

    let source: Arc<dyn RecordSource> = Arc::new(client);
    let stubs = source.list_stubs().await?;
    info!(stubs = stubs.len(), "Listed course stubs");

    let pipeline = FetchPipeline::new(PipelineConfig {
        worker_count: config.worker_count,
        fetch_delay: config.fetch_delay,
    });
    let records = pipeline.collect(source, stubs).await;
    let current = Snapshot::from_records(records);

    let diff = reconcile(&previous, &current);
    info!(
        previous = previous.len(),
        current = current.len(),
        added = diff.added.len(),
        changed = diff.changed.len(),
        removed = diff.removed.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Reconciliation complete"
    );

    if config.dry_run {
        info!("Dry run: skipping snapshot save and notification");
        for line in coursewatch::services::notifier::format_summary(&diff).lines() {
            info!("{}", line);
        }
        return Ok(());
    }

    // The new snapshot is the next run's baseline; failing to persist it is
    // a hard failure.
    let current_records = current.sorted_records();
    snapshot_store::save(&config.snapshot_path, &current_records)?;

    if let Some(report_path) = &config.report_path {
        report::write_report(report_path, &current_records)?;
    }

    let notifier: Box<dyn Notifier> = match &config.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url)?),
        None => Box::new(LogNotifier),
    };
    if let Err(e) = notifier.notify(&diff).await {
        warn!(error = %e, "Notification delivery failed");
    }

    Ok(())
}
