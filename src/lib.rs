//! coursewatch — course portal change watcher
//!
//! Harvests course records from a paginated, authenticated portal, detects
//! which courses are new, changed, or removed since the last run, persists
//! the new snapshot, and hands the diff to the report and notification
//! sinks.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod types;
pub mod workflow;

pub use error::{Error, Result};
