//! Save and load of a whole estimate.
//!
//! A snapshot is a pretty-printed JSON array of items in store order. Loading
//! is all-or-nothing and does not consult the catalog: a snapshot that refers
//! to categories or patterns the catalog has since dropped still loads, and the
//! calculator reports those references as stale.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::EstimateItem;
use crate::store::ProjectStore;

/// Extension of saved snapshots.
pub const SNAPSHOT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Malformed snapshot: item id {0} appears more than once")]
    DuplicateId(u64),

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotError {
    /// Whether the document itself was unusable, as opposed to an I/O failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_) | Self::DuplicateId(_))
    }
}

/// Serialize every item, in store order.
pub fn encode(store: &ProjectStore) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(store.items()).map_err(SnapshotError::Encode)
}

/// Rebuild a store from a snapshot document.
///
/// Items without `complexityFactors` get the neutral defaults. Unknown fields
/// are kept on the item.
pub fn decode(text: &str) -> Result<ProjectStore, SnapshotError> {
    let items: Vec<EstimateItem> = serde_json::from_str(text).map_err(SnapshotError::Malformed)?;

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(dup) = items.iter().find(|i| !seen.insert(i.id)) {
        return Err(SnapshotError::DuplicateId(dup.id));
    }

    Ok(ProjectStore::from_items(items))
}

/// `project_estimate_<YYYY-MM-DD>.<ext>`
pub fn default_file_name(date: NaiveDate, extension: &str) -> String {
    format!("project_estimate_{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Write the snapshot to `path`, replacing any existing file.
pub fn save_to_file(store: &ProjectStore, path: &Path) -> Result<(), SnapshotError> {
    let content = encode(store)?;
    fs::write(path, content).map_err(|source| SnapshotError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), items = store.len(), "Saved snapshot");
    Ok(())
}

/// Write the snapshot into `dir` under the dated default name and return its path.
pub fn save_to_dir(
    store: &ProjectStore,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
        action: "create directory",
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(default_file_name(date, SNAPSHOT_EXTENSION));
    save_to_file(store, &path)?;
    Ok(path)
}

/// Read and decode a snapshot file.
pub fn load_from_file(path: &Path) -> Result<ProjectStore, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let store = decode(&text)?;
    tracing::info!(path = %path.display(), items = store.len(), "Loaded snapshot");
    Ok(store)
}
