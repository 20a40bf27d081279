//! In-memory backend (for testing and ephemeral sessions).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::store::{StorageBackend, StorageKey, StoreError};

/// HashMap-backed [`StorageBackend`]. Nothing survives the process.
pub struct MemoryBackend {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        entries.insert(key, value.to_string());
        Ok(())
    }
}

/// [`MemoryBackend`] wrapper that rejects writes while armed. Lets session
/// tests exercise the save-failure path.
#[cfg(test)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl FlakyBackend {
    pub fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            fail_writes: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl StorageBackend for FlakyBackend {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::Storage("write rejected".into()));
        }
        self.inner.set(key, value)
    }
}
