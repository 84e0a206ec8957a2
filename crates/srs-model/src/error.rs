//! Error types for model validation.

use thiserror::Error;

/// Errors raised when constructing or mutating model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Star value outside the 1..=5 scale.
    #[error("rating value {value} is out of range (expected 1 to 5)")]
    RatingOutOfRange { value: u8 },

    /// Image index does not exist in the current collection.
    #[error("image index {index} is out of range (collection has {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    /// No rating with the given id is attached to the image.
    #[error("no rating {id} for image {path}")]
    RatingNotFound { path: String, id: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::RatingOutOfRange { value: 7 };
        assert_eq!(
            err.to_string(),
            "rating value 7 is out of range (expected 1 to 5)"
        );
    }
}
