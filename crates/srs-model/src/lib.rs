//! Data model types for Star Rating Studio.
//!
//! This crate provides the in-memory shapes shared by every other crate:
//! - **Ratings**: star ratings (1 to 5) attached to an image path, several per image
//! - **Notes**: free-text notes keyed by image path
//! - **Images**: loaded image handles, their persisted metadata, and the
//!   transient display handles issued for them
//! - **Sessions**: opaque identifiers for a working session
//!
//! # Module Organization
//!
//! - [`rating`]: `Rating`, `RatingValue`, `RatingsByPath`, `NotesByPath`, averages
//! - [`image`]: `ImageHandle`, `ImageMetadata`, `ImageCollection`, `DisplayHandles`
//! - [`session`]: `SessionId`

pub mod image;
pub mod rating;
pub mod session;

mod error;

pub use error::{ModelError, Result};

pub use image::{DisplayHandle, DisplayHandles, ImageCollection, ImageHandle, ImageMetadata};
pub use rating::{NotesByPath, Rating, RatingValue, RatingsByPath, average_rating, round_one_decimal};
pub use session::SessionId;
