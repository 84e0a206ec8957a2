//! Projection of ratings and notes into exported results.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use srs_model::{NotesByPath, Rating, RatingsByPath, average_rating};
use srs_persistence::Snapshot;

/// Exported results keyed by image path.
pub type ResultsByPath = BTreeMap<String, ImageResult>;

/// Exported summary of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Star values in rating order.
    pub ratings: Vec<u8>,
    /// Mean of `ratings`, rounded to one decimal; 0 when unrated.
    pub average: f64,
    /// Note text, present only when it is not blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fold ratings and notes into results.
///
/// Every path with ratings or notes appears. A path with only notes gets an
/// empty ratings list and an average of 0. Notes that are blank after
/// trimming are dropped; kept notes are exported as written.
pub fn project<F>(ratings: &RatingsByPath, notes: &NotesByPath, average: F) -> ResultsByPath
where
    F: Fn(&[Rating]) -> f64,
{
    let paths: BTreeSet<&String> = ratings.keys().chain(notes.keys()).collect();

    paths
        .into_iter()
        .map(|path| {
            let image_ratings = ratings.get(path).map(Vec::as_slice).unwrap_or_default();
            let note = notes
                .get(path)
                .filter(|text| !text.trim().is_empty())
                .cloned();
            let result = ImageResult {
                ratings: image_ratings.iter().map(|r| r.value.get()).collect(),
                average: if image_ratings.is_empty() {
                    0.0
                } else {
                    average(image_ratings)
                },
                notes: note,
            };
            (path.clone(), result)
        })
        .collect()
}

/// Project with the standard one-decimal mean.
pub fn project_results(ratings: &RatingsByPath, notes: &NotesByPath) -> ResultsByPath {
    project(ratings, notes, average_rating)
}

/// Project the ratings and notes held in a stored snapshot.
pub fn project_snapshot(snapshot: &Snapshot) -> ResultsByPath {
    project_results(&snapshot.image_ratings, &snapshot.image_notes)
}
