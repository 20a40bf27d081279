//! File-backed backend: one JSON file per storage key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::store::{StorageBackend, StorageKey, StoreError};

/// Stores each collection as `<key>.json` under a root directory.
///
/// Writes go through a temp file and rename, so a crash mid-write leaves
/// the previous value intact rather than a truncated one.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (or create) the storage directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StoreError::Storage(format!("open: {e}")))?;
        Ok(Self { root })
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Storage(format!("read {}: {e}", key.as_str()))),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StoreError::Storage(format!("write {}: {e}", key.as_str())))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Storage(format!("rename {}: {e}", key.as_str())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        assert_eq!(backend.get(StorageKey::History).unwrap(), None);
    }

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = FileBackend::open(dir.path()).unwrap();
            backend.set(StorageKey::List, "[\"x\"]").unwrap();
        }
        let backend = FileBackend::open(dir.path()).unwrap();
        assert_eq!(
            backend.get(StorageKey::List).unwrap(),
            Some("[\"x\"]".into())
        );
    }

    #[test]
    fn files_are_named_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        backend.set(StorageKey::Known, "[]").unwrap();
        assert!(dir.path().join("knownItems.json").exists());
    }
}
