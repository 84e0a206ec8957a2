//! Workspace errors.

use thiserror::Error;

use srs_model::ModelError;
use srs_persistence::PersistenceError;

/// Errors surfaced to the user by workspace operations.
///
/// None of these leave the workspace or the stored snapshot half-updated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The bundle held no usable images.
    #[error("the bundle contains no images")]
    EmptyCollection,

    /// An operation needs a loaded collection.
    #[error("no image collection is loaded")]
    NoCollection,

    /// The path does not name an image of the current collection.
    #[error("image '{path}' is not part of the current collection")]
    UnknownImage { path: String },

    /// Restore was requested without stored progress.
    #[error("there is no saved progress to restore")]
    NothingToRestore,

    /// The re-supplied collection is not the one the progress was saved for.
    #[error("loaded images do not match the saved collection '{expected}'")]
    CollectionMismatch { expected: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Persistence(PersistenceError),
}

impl From<PersistenceError> for CoreError {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::CollectionMismatch { expected } => {
                Self::CollectionMismatch { expected }
            }
            other => Self::Persistence(other),
        }
    }
}

impl CoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCollection => {
                "No images were found in this bundle. Supported formats are \
                JPG, PNG, GIF, BMP, WebP and SVG."
                    .to_string()
            }
            Self::NoCollection => "Load an image bundle first.".to_string(),
            Self::UnknownImage { path } => format!("There is no image named \"{path}\"."),
            Self::NothingToRestore => "There is no saved progress to continue.".to_string(),
            Self::CollectionMismatch { expected } => format!(
                "These images do not match your saved progress. \
                Please load the same bundle you were rating: \"{expected}\"."
            ),
            Self::Model(error) => error.to_string(),
            Self::Persistence(error) => error.user_message(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::EmptyCollection => Some("Choose a zip archive that contains images.".into()),
            Self::NothingToRestore => {
                Some("Open the bundle without resuming to start a new session.".into())
            }
            Self::CollectionMismatch { .. } => Some(
                "Load the original bundle, or start fresh to discard the saved progress.".into(),
            ),
            Self::Persistence(error) => error.suggestion(),
            Self::NoCollection | Self::UnknownImage { .. } | Self::Model(_) => None,
        }
    }
}

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, CoreError>;
