//! Star ratings and notes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, Result};

/// Ratings per image path, in insertion order.
///
/// The last element of each list is the most recent rating.
pub type RatingsByPath = BTreeMap<String, Vec<Rating>>;

/// Free-text notes per image path. A missing entry reads as an empty note.
pub type NotesByPath = BTreeMap<String, String>;

/// A star value on the 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    /// Lowest accepted value.
    pub const MIN: u8 = 1;
    /// Highest accepted value.
    pub const MAX: u8 = 5;

    /// Validate a raw star value.
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::RatingOutOfRange { value })
        }
    }

    /// The raw star count.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RatingValue {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rating event on an image.
///
/// Only `value` may change after creation; the id and timestamp are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Opaque unique identifier.
    pub id: String,
    /// Star value.
    pub value: RatingValue,
    /// When the rating was created.
    pub timestamp: DateTime<Utc>,
}

impl Rating {
    /// Create a rating with a fresh id, stamped now.
    pub fn new(value: RatingValue) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            value,
            timestamp: Utc::now(),
        }
    }
}

/// Round to one decimal place (4.333 -> 4.3).
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean of the star values, rounded to one decimal.
///
/// Zero ratings average to 0.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|r| u32::from(r.value.get())).sum();
    round_one_decimal(f64::from(sum) / ratings.len() as f64)
}
