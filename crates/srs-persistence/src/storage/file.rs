//! File-backed storage: one JSON file per key.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::StorageBackend;
use crate::error::{PersistenceError, Result};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temp file that is synced and then renamed over the
/// target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn storage_error(operation: &'static str, key: &str, source: std::io::Error) -> PersistenceError {
    PersistenceError::Storage {
        operation,
        key: key.to_string(),
        source,
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).map_err(|e| storage_error("create directory for", key, e))?;

        let mut file = File::create(&temp_path).map_err(|e| storage_error("create", key, e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| storage_error("write", key, e))?;
        file.sync_all().map_err(|e| storage_error("sync", key, e))?;

        fs::rename(&temp_path, &path).map_err(|e| storage_error("replace", key, e))?;

        tracing::debug!("Wrote storage slot {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read("slot").unwrap(), None);
        storage.write("slot", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("slot").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(storage.path_for("slot").exists());
        assert!(!storage.path_for("slot").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.write("slot", "x").unwrap();
        storage.remove("slot").unwrap();
        storage.remove("slot").unwrap();
        assert_eq!(storage.read("slot").unwrap(), None);
    }
}
