//! Common error types for coursewatch

use thiserror::Error;

/// Common result type for coursewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the watcher.
///
/// Configuration errors are fatal and abort the run before any network
/// activity. Source errors are recoverable at the per-record level.
/// Persistence errors are swallowed on load (treated as "no history") and
/// propagated on save.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Portal or record-source error
    #[error("Source error: {0}")]
    Source(String),

    /// HTTP transport error (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization or persistence error
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Notification delivery error
    #[error("Notification error: {0}")]
    Notify(String),
}
