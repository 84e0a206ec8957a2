//! Lightweight snapshot summary.

use chrono::{DateTime, Utc};

use super::Snapshot;

/// Summary of the stored snapshot, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Whether a live (parseable, unexpired) snapshot exists.
    pub present: bool,
    pub session_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub collection_name: Option<String>,
    pub image_count: Option<usize>,
    /// Sum of rating counts across all images.
    pub rated_count: Option<usize>,
}

impl SnapshotInfo {
    /// The summary of an empty slot.
    pub fn absent() -> Self {
        Self::default()
    }
}

impl From<&Snapshot> for SnapshotInfo {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            present: true,
            session_id: Some(snapshot.session_id.to_string()),
            timestamp: snapshot.saved_at(),
            collection_name: snapshot.collection_name().map(str::to_string),
            image_count: Some(snapshot.image_order.len()),
            rated_count: Some(snapshot.rated_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_entries() {
        let json = r#"{
            "sessionId": "session_1_abc",
            "timestamp": 1700000000000,
            "currentImageIndex": 1,
            "imageRatings": {
                "a.png": [{"id": "1", "value": 5, "timestamp": "2024-01-01T00:00:00Z"}],
                "b.png": [
                    {"id": "2", "value": 1, "timestamp": "2024-01-01T00:00:00Z"},
                    {"id": "3", "value": 3, "timestamp": "2024-01-02T00:00:00Z"}
                ]
            },
            "imageNotes": {},
            "imageMetadata": [
                {"path": "a.png", "size": 1, "lastModified": 0},
                {"path": "b.png", "size": 2, "lastModified": 0}
            ],
            "imageOrder": ["a.png", "b.png"],
            "zipFileName": "set.zip"
        }"#;

        let info = SnapshotInfo::from(&Snapshot::from_json(json).unwrap());
        assert!(info.present);
        assert_eq!(info.session_id.as_deref(), Some("session_1_abc"));
        assert_eq!(info.collection_name.as_deref(), Some("set.zip"));
        assert_eq!(info.image_count, Some(2));
        assert_eq!(info.rated_count, Some(3));
        assert_eq!(info.timestamp.map(|t| t.timestamp_millis()), Some(1_700_000_000_000));
    }

    #[test]
    fn test_absent() {
        let info = SnapshotInfo::absent();
        assert!(!info.present);
        assert_eq!(info.image_count, None);
    }
}
