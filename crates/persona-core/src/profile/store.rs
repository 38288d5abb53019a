//! Per-profile file persistence
//!
//! One YAML file per profile, named `<id>.yaml`, under a configured base
//! directory. Writes go through the atomic temp-then-rename utility so a
//! partially written profile is never observable on disk.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ProfileError, ProfileResult};
use super::types::Profile;
use crate::util::atomic_write;

/// Reads and writes profile files under a base directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Create a store rooted at `dir`. The directory is not created until
    /// [`ProfileStore::ensure_dir`] is called.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The base directory holding the profile files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file path for a profile ID
    #[must_use]
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.yaml"))
    }

    /// Create the base directory if it does not exist.
    ///
    /// # Errors
    /// Returns [`ProfileError::Io`] if directory creation fails.
    pub fn ensure_dir(&self) -> ProfileResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ProfileError::io(&self.dir, &e))
    }

    /// List candidate profile file paths in the base directory, sorted.
    ///
    /// # Errors
    /// Returns [`ProfileError::Io`] if the directory cannot be read.
    pub fn scan(&self) -> ProfileResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(|e| ProfileError::io(&self.dir, &e))? {
            let entry = entry.map_err(|e| ProfileError::io(&self.dir, &e))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Read and deserialize a single profile file.
    ///
    /// The caller is expected to validate the result immediately; a profile
    /// failing validation on load is excluded from the set, not fatal.
    ///
    /// # Errors
    /// Returns [`ProfileError::Io`] on read failure and
    /// [`ProfileError::Parse`] on malformed YAML.
    pub fn load(&self, path: &Path) -> ProfileResult<Profile> {
        let data = fs::read_to_string(path).map_err(|e| ProfileError::io(path, &e))?;
        serde_yaml_ng::from_str(&data).map_err(|e| ProfileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize and atomically write a profile to `<id>.yaml`.
    ///
    /// # Errors
    /// Returns [`ProfileError::Parse`] on serialization failure and
    /// [`ProfileError::Io`] if the temp write or rename fails. The previous
    /// file is left untouched on any failure.
    pub fn write(&self, profile: &Profile) -> ProfileResult<()> {
        let path = self.path_for(&profile.id);
        let data = serde_yaml_ng::to_string(profile).map_err(|e| ProfileError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        atomic_write(&path, data.as_bytes()).map_err(|e| ProfileError::io(&path, &e))
    }

    /// Remove a profile file.
    ///
    /// # Errors
    /// Returns [`ProfileError::Io`] if the file cannot be removed.
    pub fn remove(&self, id: &str) -> ProfileResult<()> {
        let path = self.path_for(id);
        fs::remove_file(&path).map_err(|e| ProfileError::io(&path, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.ensure_dir().unwrap();

        let mut profile = Profile::new("roundtrip", "Roundtrip");
        profile
            .environment
            .insert("KEY".to_string(), "value".to_string());
        store.write(&profile).unwrap();

        let loaded = store.load(&store.path_for("roundtrip")).unwrap();
        assert_eq!(loaded.id, "roundtrip");
        assert_eq!(loaded.name, "Roundtrip");
        assert_eq!(loaded.environment.get("KEY"), Some(&"value".to_string()));
        assert_eq!(loaded.created_at, profile.created_at);
    }

    #[test]
    fn test_load_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "{not yaml: [").unwrap();

        let err = store.load(&path).unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_scan_filters_non_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.ensure_dir().unwrap();

        store.write(&Profile::new("one", "One")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let paths = store.scan().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0], store.path_for("one"));
    }

    #[test]
    fn test_remove_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());

        let err = store.remove("ghost").unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
