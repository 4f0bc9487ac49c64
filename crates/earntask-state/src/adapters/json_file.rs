//! # JSON File Persistence
//!
//! Stores the entire snapshot as one JSON document at a well-known path,
//! written in full on every save and read in full at startup.
//!
//! Saves go through a sibling temp file followed by a rename, so a crash
//! mid-write leaves the previous document intact. A document that fails to
//! parse is reported as corrupt; the store then falls back to its seed state
//! instead of refusing to start.

use crate::domain::{AppState, PersistenceError};
use crate::ports::StatePersistence;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the snapshot document inside the data directory.
pub const SNAPSHOT_FILE: &str = "earntask_state.json";

/// File-backed implementation of StatePersistence.
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist under `data_dir/earntask_state.json`, creating the directory
    /// if needed.
    pub fn in_dir(data_dir: &Path) -> Result<Self, PersistenceError> {
        fs::create_dir_all(data_dir)
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(Self {
            path: data_dir.join(SNAPSHOT_FILE),
        })
    }

    /// Persist at an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatePersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<AppState>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(PersistenceError::Unavailable(err.to_string())),
        };
        let state =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<(), PersistenceError> {
        let raw = serde_json::to_vec_pretty(state)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
