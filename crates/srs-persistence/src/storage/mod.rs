//! Backing media for the snapshot slot.
//!
//! The store only needs a string key-value register, so any medium that can
//! read, replace, and remove a value by key will do:
//! - `MemoryStorage` - in-process map, optional quota (tests, ephemeral runs)
//! - `FileStorage` - one JSON file per key with atomic replacement

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// A local persistent key-value medium.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an empty slot succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}
