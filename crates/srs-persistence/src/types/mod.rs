//! Persisted progress types.
//!
//! The JSON field names (`sessionId`, `imageRatings`, ...) are the stored
//! format. There is no schema version: a payload that no longer parses is
//! treated as absent and cleared.

mod info;
mod snapshot;

pub use info::SnapshotInfo;
pub use snapshot::Snapshot;
