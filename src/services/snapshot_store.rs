//! Snapshot persistence
//!
//! The snapshot file is a JSON array of course records. Load failures of any
//! kind (missing file, unreadable file, malformed JSON) degrade to an empty
//! snapshot: a first run and a corrupted-state run both mean "no history".
//! Save failures propagate, because a snapshot that fails to persist leaves
//! the next run without a valid baseline.

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{CourseRecord, Snapshot};

/// Load the previous snapshot, or an empty one if there is no usable history.
pub fn load(path: &Path) -> Snapshot {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No previous snapshot, starting empty");
            return Snapshot::default();
        }
    };

    match serde_json::from_str::<Vec<CourseRecord>>(&raw) {
        Ok(records) => {
            info!(path = %path.display(), count = records.len(), "Loaded previous snapshot");
            Snapshot::from_records(records)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot file is malformed, treating as no history");
            Snapshot::default()
        }
    }
}

/// Persist the full current record list, overwriting any previous content.
///
/// Records are written sorted by id so the file is stable across runs with
/// identical content. Missing parent directories are created.
pub fn save(path: &Path, records: &[CourseRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut sorted: Vec<&CourseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let json = serde_json::to_string_pretty(&sorted)
        .map_err(|e| Error::Persistence(format!("Snapshot serialization failed: {}", e)))?;
    fs::write(path, json)?;

    info!(path = %path.display(), count = records.len(), "Saved snapshot");
    Ok(())
}
