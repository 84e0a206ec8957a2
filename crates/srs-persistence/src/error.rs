//! Persistence error types.
//!
//! Storage and encoding failures are absorbed at the `SnapshotStore`
//! boundary and only logged. The one error that reaches users is a
//! collection mismatch on restore, so every variant carries a
//! user-facing message and an optional remediation hint.

use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing medium failed.
    #[error("Failed to {operation} storage slot '{key}'")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing medium refused a write that would exceed its quota.
    #[error("Storage quota exceeded writing '{key}' ({needed} bytes, quota {quota} bytes)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// Serialization error.
    #[error("Failed to serialize progress snapshot")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization error.
    #[error("Failed to deserialize progress snapshot")]
    Deserialization {
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but violates the snapshot structure.
    #[error("Progress snapshot is corrupt: {reason}")]
    CorruptSnapshot { reason: String },

    /// A re-supplied collection does not match the stored snapshot.
    #[error("Loaded images do not match the saved collection '{expected}'")]
    CollectionMismatch { expected: String },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage { operation, .. } => {
                format!("Could not {operation} your saved progress.")
            }
            Self::QuotaExceeded { .. } => {
                "There is not enough local storage left to save your progress.".to_string()
            }
            Self::Serialization { .. } => {
                "An error occurred while saving your progress.".to_string()
            }
            Self::Deserialization { .. } | Self::CorruptSnapshot { .. } => {
                "Your saved progress could not be read and has been discarded.".to_string()
            }
            Self::CollectionMismatch { expected } => {
                format!(
                    "These images do not match your saved progress. \
                    Please load the same bundle you were rating: \"{expected}\"."
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Storage { .. } | Self::QuotaExceeded { .. } => Some(
                "Export your results now; progress since the last successful save may be lost."
                    .into(),
            ),
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } | Self::CorruptSnapshot { .. } => {
                Some("Start a new session by loading your image bundle again.".into())
            }
            Self::CollectionMismatch { .. } => Some(
                "Load the original bundle, or start fresh to discard the saved progress.".into(),
            ),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_names_bundle() {
        let err = PersistenceError::CollectionMismatch {
            expected: "holiday.zip".to_string(),
        };
        assert!(err.user_message().contains("\"holiday.zip\""));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_quota_display() {
        let err = PersistenceError::QuotaExceeded {
            key: "slot".to_string(),
            needed: 10,
            quota: 4,
        };
        assert_eq!(
            err.to_string(),
            "Storage quota exceeded writing 'slot' (10 bytes, quota 4 bytes)"
        );
    }
}
