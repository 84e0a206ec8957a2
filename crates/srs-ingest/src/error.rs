//! Error types for bundle extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting an image bundle.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read the bundle file.
    #[error("failed to read bundle {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a readable zip archive.
    #[error("not a readable zip archive: {source}")]
    Archive {
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive holds no supported, decodable image.
    #[error("no images found in bundle (supported: jpg, jpeg, png, gif, bmp, webp, svg)")]
    NoImages,
}

impl From<zip::result::ZipError> for IngestError {
    fn from(source: zip::result::ZipError) -> Self {
        Self::Archive { source }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
