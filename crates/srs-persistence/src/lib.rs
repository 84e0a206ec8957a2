//! Progress persistence and recovery for Star Rating Studio.
//!
//! This crate keeps a rating session alive across restarts and crashes by
//! snapshotting its state to a single-slot local store.
//!
//! # Features
//!
//! - **Single-slot snapshots** serialized as JSON, last writer wins
//! - **Self-healing reads**: corrupt or expired snapshots are cleared on sight
//! - **Compatibility checking** of a re-supplied collection against a snapshot
//! - **Order reconciliation** restoring the exact saved image sequence
//! - **Auto-save** with a cancellable debounce and an unconditional flush
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use srs_persistence::{AutoSaveConfig, AutoSaveScheduler, MemoryStorage, SnapshotStore};
//!
//! let store = Arc::new(SnapshotStore::new(MemoryStorage::new()));
//! let mut autosave = AutoSaveScheduler::new(Arc::clone(&store), AutoSaveConfig::default());
//!
//! // After every mutation
//! autosave.arm(payload);
//!
//! // On the next start
//! if let Some(snapshot) = store.load() {
//!     let images = prepare_restore(&snapshot, freshly_loaded_images)?;
//! }
//! ```
//!
//! # Architecture
//!
//! - `storage/` - Backing media (`StorageBackend`, memory, files)
//! - `types/` - The persisted `Snapshot` and its summary
//! - `store.rs` - `SnapshotStore`: save, load, info, clear
//! - `compat.rs` - Positional path + size compatibility check
//! - `reconcile.rs` - Reordering a collection into a saved sequence
//! - `restore.rs` - Reconcile-then-check restore pipeline
//! - `autosave/` - Debounced scheduler and save bookkeeping
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod compat;
mod error;
mod reconcile;
mod restore;
mod storage;
mod store;
mod types;

pub use autosave::{AutoSaveConfig, AutoSaveScheduler, SavePayload, SaveTracker};
pub use compat::{CollectionEntry, is_compatible};
pub use error::{PersistenceError, Result};
pub use reconcile::reconcile;
pub use restore::prepare_restore;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::{DEFAULT_SLOT_KEY, EXPIRY_WINDOW, SnapshotStore};
pub use types::{Snapshot, SnapshotInfo};
