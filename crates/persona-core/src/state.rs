//! Persisted active-profile state
//!
//! A single small JSON file, separate from the profiles directory, that
//! remembers which profile is active across runs. Failures here are always
//! soft: the manager logs them and carries on.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::atomic_write;

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur reading or writing the state file
#[derive(Debug, Error)]
pub enum StateError {
    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// JSON encode/decode error
    #[error("JSON error in {path}: {message}")]
    Json { path: PathBuf, message: String },
}

/// The persistent application state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// ID of the active profile, empty when none has been selected
    #[serde(default)]
    pub active_profile: String,
    /// When the state file was last written
    #[serde(default)]
    pub last_updated: DateTime<Utc>,
}

/// Reads and writes the state file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store for `<base_dir>/state.json`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: base_dir.into().join("state.json"),
        }
    }

    /// The state file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state from disk. An absent file is not an error: it yields
    /// the default (empty) state.
    ///
    /// # Errors
    /// Returns an error on read failure other than absence, or on malformed
    /// JSON.
    pub fn load(&self) -> StateResult<State> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(State::default()),
            Err(e) => {
                return Err(StateError::Io {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        serde_json::from_str(&data).map_err(|e| StateError::Json {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the state to disk atomically, stamping `last_updated`.
    ///
    /// # Errors
    /// Returns an error if encoding or the atomic write fails.
    pub fn save(&self, state: &State) -> StateResult<()> {
        let stamped = State {
            active_profile: state.active_profile.clone(),
            last_updated: Utc::now(),
        };
        let data = serde_json::to_vec_pretty(&stamped).map_err(|e| StateError::Json {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        atomic_write(&self.path, &data).map_err(|e| StateError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Update and persist the active profile ID.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn set_active_profile(&self, id: &str) -> StateResult<()> {
        self.save(&State {
            active_profile: id.to_string(),
            last_updated: Utc::now(),
        })
    }

    /// The active profile ID from saved state, empty when none is recorded.
    ///
    /// # Errors
    /// Returns an error if the state file exists but cannot be read or
    /// parsed.
    pub fn active_profile(&self) -> StateResult<String> {
        Ok(self.load()?.active_profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        assert_eq!(store.active_profile().unwrap(), "");
    }

    #[test]
    fn test_set_and_get_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        store.set_active_profile("work").unwrap();
        assert_eq!(store.active_profile().unwrap(), "work");
    }

    #[test]
    fn test_state_file_wire_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        store.set_active_profile("work").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["activeProfile"], "work");
        assert!(value.get("lastUpdated").is_some());
    }

    #[test]
    fn test_malformed_state_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_err());
    }
}
