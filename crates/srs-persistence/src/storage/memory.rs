//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::StorageBackend;
use crate::error::{PersistenceError, Result};

/// Process-local storage, optionally limited to a byte quota per value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value is larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }

    fn slots(
        &self,
        key: &str,
        operation: &'static str,
    ) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.slots.lock().map_err(|_| PersistenceError::Storage {
            operation,
            key: key.to_string(),
            source: std::io::Error::other("storage lock poisoned"),
        })
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots(key, "read")?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(PersistenceError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len(),
                quota,
            });
        }
        self.slots(key, "write")?
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots(key, "remove")?.remove(key);
        Ok(())
    }
}
