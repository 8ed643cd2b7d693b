//! Configuration resolution
//!
//! One explicit [`Config`] struct, constructed once at startup and passed
//! into the pipeline — no ambient globals. Every setting resolves with
//! priority: command-line argument → `COURSEWATCH_*` environment variable →
//! TOML config file → compiled default. Missing portal coordinates are a
//! fatal configuration error, raised before any network activity.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_SNAPSHOT_PATH: &str = "data/courses.json";
const DEFAULT_WORKER_COUNT: usize = 3;
const DEFAULT_FETCH_DELAY_MS: u64 = 900;

/// Command-line interface (clap also resolves the environment tier)
#[derive(Parser, Debug, Default)]
#[command(name = "coursewatch", version, about = "Course portal change watcher")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "COURSEWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the course portal
    #[arg(long, env = "COURSEWATCH_PORTAL_URL")]
    pub portal_url: Option<String>,

    /// Portal login user
    #[arg(long, env = "COURSEWATCH_PORTAL_USER")]
    pub portal_user: Option<String>,

    /// Portal login password
    #[arg(long, env = "COURSEWATCH_PORTAL_PASSWORD")]
    pub portal_password: Option<String>,

    /// Snapshot file location
    #[arg(long, env = "COURSEWATCH_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// HTML report location (omit to skip the report)
    #[arg(long, env = "COURSEWATCH_REPORT")]
    pub report: Option<PathBuf>,

    /// Chat webhook URL (omit to log the summary instead)
    #[arg(long, env = "COURSEWATCH_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Number of concurrent fetch workers
    #[arg(long, env = "COURSEWATCH_WORKERS")]
    pub workers: Option<usize>,

    /// Pacing delay between detail fetches, in milliseconds
    #[arg(long, env = "COURSEWATCH_FETCH_DELAY_MS")]
    pub fetch_delay_ms: Option<u64>,

    /// Fetch and diff, but skip snapshot save and notification
    #[arg(long)]
    pub dry_run: bool,
}

/// TOML file tier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub portal_url: Option<String>,
    pub portal_user: Option<String>,
    pub portal_password: Option<String>,
    pub snapshot: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub workers: Option<usize>,
    pub fetch_delay_ms: Option<u64>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub portal_url: String,
    pub portal_user: String,
    pub portal_password: String,
    pub snapshot_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub webhook_url: Option<String>,
    pub worker_count: usize,
    pub fetch_delay: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Resolve the effective configuration from all tiers.
    pub fn resolve(cli: Cli) -> Result<Config> {
        let file = match &cli.config {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: Cli, file: FileConfig) -> Result<Config> {
        let portal_url = cli.portal_url.or(file.portal_url).ok_or_else(|| {
            Error::Config(
                "Portal base URL not configured. Set one of:\n\
                 1. Command line: --portal-url https://portal.example/\n\
                 2. Environment: COURSEWATCH_PORTAL_URL=https://portal.example/\n\
                 3. Config file: portal_url = \"https://portal.example/\""
                    .to_string(),
            )
        })?;
        let portal_user = cli.portal_user.or(file.portal_user).ok_or_else(|| {
            Error::Config(
                "Portal user not configured (--portal-user, COURSEWATCH_PORTAL_USER, or portal_user)"
                    .to_string(),
            )
        })?;
        let portal_password = cli.portal_password.or(file.portal_password).ok_or_else(|| {
            Error::Config(
                "Portal password not configured (--portal-password, COURSEWATCH_PORTAL_PASSWORD, or portal_password)"
                    .to_string(),
            )
        })?;

        let worker_count = cli
            .workers
            .or(file.workers)
            .unwrap_or(DEFAULT_WORKER_COUNT);
        if worker_count == 0 {
            return Err(Error::Config("Worker count must be at least 1".to_string()));
        }

        let fetch_delay_ms = cli
            .fetch_delay_ms
            .or(file.fetch_delay_ms)
            .unwrap_or(DEFAULT_FETCH_DELAY_MS);

        Ok(Config {
            portal_url,
            portal_user,
            portal_password,
            snapshot_path: cli
                .snapshot
                .or(file.snapshot)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            report_path: cli.report.or(file.report),
            webhook_url: cli.webhook_url.or(file.webhook_url),
            worker_count,
            fetch_delay: Duration::from_millis(fetch_delay_ms),
            dry_run: cli.dry_run,
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read config file {}: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Cannot parse config file {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
