//! Snapshot persistence.
//!
//! Reads are tolerant: a missing, unreadable, or corrupt file is an
//! empty starting point, never an error. Writes go to a temporary
//! sibling first and are renamed into place, so a reader of the target
//! path always sees a complete document.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::Result;

use super::Snapshot;

/// File-backed snapshot store.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot, tolerating any kind of damage.
    pub fn load(&self) -> Option<Snapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No previous snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!(
                    "Could not read previous snapshot {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    "Previous snapshot {} is not valid JSON ({}), starting empty",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Write the snapshot atomically: temp sibling, then rename.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut json = serde_json::to_string_pretty(snapshot)?;
        json.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
