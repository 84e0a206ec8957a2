//! The persisted progress record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use srs_model::{ImageMetadata, NotesByPath, RatingsByPath, SessionId};

use crate::error::{PersistenceError, Result};

/// One persisted record of the full rating state.
///
/// Only one snapshot is retained at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Session that wrote the snapshot. Never validated on load.
    pub session_id: SessionId,

    /// Write time, as Unix milliseconds.
    pub timestamp: i64,

    /// Index of the image being viewed.
    pub current_image_index: usize,

    /// Ratings per image path.
    pub image_ratings: RatingsByPath,

    /// Notes per image path.
    pub image_notes: NotesByPath,

    /// Path, size and modification time of each image, in collection order.
    pub image_metadata: Vec<ImageMetadata>,

    /// Image paths in the exact order at save time.
    pub image_order: Vec<String>,

    /// Name of the source bundle (empty when unknown).
    pub zip_file_name: String,
}

impl Snapshot {
    /// Parse and structurally validate a stored payload.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|source| PersistenceError::Deserialization { source })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| PersistenceError::Serialization { source })
    }

    /// Check `imageMetadata` and `imageOrder` describe the same sequence length.
    pub fn validate(&self) -> Result<()> {
        if self.image_metadata.len() != self.image_order.len() {
            return Err(PersistenceError::CorruptSnapshot {
                reason: format!(
                    "{} metadata entries for {} ordered images",
                    self.image_metadata.len(),
                    self.image_order.len()
                ),
            });
        }
        Ok(())
    }

    /// Parse the write timestamp.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// The source bundle name, if one was recorded.
    pub fn collection_name(&self) -> Option<&str> {
        let name = self.zip_file_name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Total number of ratings across all images.
    pub fn rated_count(&self) -> usize {
        self.image_ratings.values().map(Vec::len).sum()
    }
}
