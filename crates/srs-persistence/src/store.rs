//! The single-slot snapshot store.

use std::time::Duration;

use chrono::{DateTime, Utc};

use srs_model::{ImageMetadata, NotesByPath, RatingsByPath, SessionId};

use crate::error::Result;
use crate::storage::StorageBackend;
use crate::types::{Snapshot, SnapshotInfo};

/// Storage key of the progress slot.
pub const DEFAULT_SLOT_KEY: &str = "imageRatingProgress";

/// Snapshots older than this are discarded on read.
pub const EXPIRY_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Reads and writes the one progress snapshot kept on a backing medium.
///
/// None of the public operations fail observably: storage and encoding
/// errors are logged, and unreadable or expired data reads as absent and is
/// cleared so it is never served twice.
#[derive(Debug)]
pub struct SnapshotStore<B> {
    backend: B,
    key: String,
    expiry: Duration,
}

impl<B: StorageBackend> SnapshotStore<B> {
    /// Create a store on `backend` using the default key and expiry.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_SLOT_KEY.to_string(),
            expiry: EXPIRY_WINDOW,
        }
    }

    /// Use a different slot key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different expiry window.
    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Build a snapshot stamped now and write it, replacing any prior one.
    ///
    /// `images` are in collection order; `imageOrder` and `imageMetadata`
    /// are derived from them positionally.
    pub fn try_save(
        &self,
        session_id: &SessionId,
        current_index: usize,
        ratings: &RatingsByPath,
        notes: &NotesByPath,
        images: &[ImageMetadata],
        collection_name: &str,
    ) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let snapshot = Snapshot {
            session_id: session_id.clone(),
            timestamp: now.timestamp_millis(),
            current_image_index: current_index,
            image_ratings: ratings.clone(),
            image_notes: notes.clone(),
            image_metadata: images.to_vec(),
            image_order: images.iter().map(|m| m.path.clone()).collect(),
            zip_file_name: collection_name.to_string(),
        };
        self.write_snapshot(&snapshot)?;
        tracing::info!(
            images = images.len(),
            ratings = snapshot.rated_count(),
            "Saved progress snapshot"
        );
        Ok(now)
    }

    /// Like [`try_save`](Self::try_save), but failures are logged and
    /// swallowed. Returns the write time on success.
    pub fn save(
        &self,
        session_id: &SessionId,
        current_index: usize,
        ratings: &RatingsByPath,
        notes: &NotesByPath,
        images: &[ImageMetadata],
        collection_name: &str,
    ) -> Option<DateTime<Utc>> {
        match self.try_save(
            session_id,
            current_index,
            ratings,
            notes,
            images,
            collection_name,
        ) {
            Ok(at) => Some(at),
            Err(error) => {
                tracing::warn!(%error, "Failed to save progress; keeping in-memory state");
                None
            }
        }
    }

    /// Write an already-built snapshot to the slot.
    pub fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        self.backend.write(&self.key, &json)
    }

    /// Read the stored snapshot.
    ///
    /// Returns `None` when the slot is empty, unreadable, malformed or
    /// expired. Malformed and expired payloads are cleared.
    pub fn load(&self) -> Option<Snapshot> {
        let raw = self.read_slot()?;
        match Snapshot::from_json(&raw) {
            Ok(snapshot) if self.is_expired(snapshot.timestamp) => {
                tracing::info!("Stored progress expired; clearing");
                self.clear();
                None
            }
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                tracing::warn!(%error, "Stored progress is unreadable; clearing");
                self.clear();
                None
            }
        }
    }

    /// Summarize the stored snapshot.
    ///
    /// Present exactly when [`load`](Self::load) would return a snapshot.
    pub fn info(&self) -> SnapshotInfo {
        self.load()
            .map_or_else(SnapshotInfo::absent, |snapshot| SnapshotInfo::from(&snapshot))
    }

    /// Remove the stored snapshot. Idempotent; failures are only logged.
    pub fn clear(&self) {
        if let Err(error) = self.backend.remove(&self.key) {
            tracing::warn!(%error, "Failed to clear stored progress");
        }
    }

    fn read_slot(&self) -> Option<String> {
        match self.backend.read(&self.key) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%error, "Failed to read stored progress");
                None
            }
        }
    }

    fn is_expired(&self, timestamp_ms: i64) -> bool {
        let age_ms = Utc::now().timestamp_millis().saturating_sub(timestamp_ms);
        i128::from(age_ms) > self.expiry.as_millis() as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use srs_model::{Rating, RatingValue};

    fn metadata(paths: &[&str]) -> Vec<ImageMetadata> {
        paths
            .iter()
            .map(|p| ImageMetadata {
                path: (*p).to_string(),
                size: 10,
                last_modified: 0,
            })
            .collect()
    }

    fn sample_ratings() -> RatingsByPath {
        let mut ratings = RatingsByPath::new();
        ratings.insert(
            "b.png".to_string(),
            vec![Rating::new(RatingValue::new(4).unwrap())],
        );
        ratings
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = SnapshotStore::new(MemoryStorage::new());
        let session = SessionId::generate();
        let ratings = sample_ratings();
        let mut notes = NotesByPath::new();
        notes.insert("a.png".to_string(), "blurry".to_string());
        let images = metadata(&["b.png", "a.png"]);

        assert!(
            store
                .save(&session, 1, &ratings, &notes, &images, "set.zip")
                .is_some()
        );

        let loaded = store.load().unwrap();
        assert_eq!(loaded.session_id, session);
        assert_eq!(loaded.current_image_index, 1);
        assert_eq!(loaded.image_ratings, ratings);
        assert_eq!(loaded.image_notes, notes);
        assert_eq!(loaded.image_order, vec!["b.png", "a.png"]);
        assert_eq!(loaded.image_metadata, images);
        assert_eq!(loaded.zip_file_name, "set.zip");
    }

    #[test]
    fn test_save_swallows_quota_failure() {
        let store = SnapshotStore::new(MemoryStorage::with_quota(16));
        let result = store.save(
            &SessionId::generate(),
            0,
            &sample_ratings(),
            &NotesByPath::new(),
            &metadata(&["b.png"]),
            "set.zip",
        );
        assert!(result.is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_corrupt_payload_is_cleared() {
        let store = SnapshotStore::new(MemoryStorage::new());
        store.backend().write(DEFAULT_SLOT_KEY, "{\"broken\":").unwrap();

        assert!(store.load().is_none());
        assert_eq!(store.backend().read(DEFAULT_SLOT_KEY).unwrap(), None);
    }

    #[test]
    fn test_info_counts_ratings() {
        let store = SnapshotStore::new(MemoryStorage::new());
        let mut ratings = sample_ratings();
        ratings
            .get_mut("b.png")
            .unwrap()
            .push(Rating::new(RatingValue::new(1).unwrap()));
        store.save(
            &SessionId::generate(),
            0,
            &ratings,
            &NotesByPath::new(),
            &metadata(&["a.png", "b.png", "c.png"]),
            "set.zip",
        );

        let info = store.info();
        assert!(info.present);
        assert_eq!(info.image_count, Some(3));
        assert_eq!(info.rated_count, Some(2));
        assert_eq!(info.collection_name.as_deref(), Some("set.zip"));
    }

    #[test]
    fn test_info_agrees_with_load_on_invalid_fields() {
        let payloads = [
            // Rating value outside 1..=5.
            r#"{"sessionId":"s","timestamp":TS,"currentImageIndex":0,
                "imageRatings":{"a.png":[{"id":"1","value":9,"timestamp":"2024-01-01T00:00:00Z"}]},
                "imageNotes":{},"imageMetadata":[{"path":"a.png","size":1,"lastModified":0}],
                "imageOrder":["a.png"],"zipFileName":"set.zip"}"#,
            // Missing notes.
            r#"{"sessionId":"s","timestamp":TS,"currentImageIndex":0,"imageRatings":{},
                "imageMetadata":[{"path":"a.png","size":1,"lastModified":0}],
                "imageOrder":["a.png"],"zipFileName":"set.zip"}"#,
            // Negative index.
            r#"{"sessionId":"s","timestamp":TS,"currentImageIndex":-1,"imageRatings":{},
                "imageNotes":{},"imageMetadata":[{"path":"a.png","size":1,"lastModified":0}],
                "imageOrder":["a.png"],"zipFileName":"set.zip"}"#,
        ];
        let now = Utc::now().timestamp_millis().to_string();

        for payload in payloads {
            let payload = payload.replace("TS", &now);
            let by_info = SnapshotStore::new(MemoryStorage::new());
            by_info.backend().write(DEFAULT_SLOT_KEY, &payload).unwrap();
            let by_load = SnapshotStore::new(MemoryStorage::new());
            by_load.backend().write(DEFAULT_SLOT_KEY, &payload).unwrap();

            let info = by_info.info();
            assert_eq!(info.present, by_load.load().is_some(), "{payload}");
            assert_eq!(info, SnapshotInfo::absent());
            assert_eq!(by_info.backend().read(DEFAULT_SLOT_KEY).unwrap(), None);
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = SnapshotStore::new(MemoryStorage::new());
        store.clear();
        store.save(
            &SessionId::generate(),
            0,
            &RatingsByPath::new(),
            &NotesByPath::new(),
            &metadata(&["a.png"]),
            "",
        );
        store.clear();
        store.clear();
        assert!(store.load().is_none());
        assert!(!store.info().present);
    }

    #[test]
    fn test_custom_key() {
        let store = SnapshotStore::new(MemoryStorage::new()).with_key("other");
        store.save(
            &SessionId::generate(),
            0,
            &RatingsByPath::new(),
            &NotesByPath::new(),
            &metadata(&["a.png"]),
            "",
        );
        assert!(store.backend().read("other").unwrap().is_some());
        assert!(store.backend().read(DEFAULT_SLOT_KEY).unwrap().is_none());
    }
}
