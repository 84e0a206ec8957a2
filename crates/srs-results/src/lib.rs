//! Results projection and export.
//!
//! Folds raw per-image rating events into the exported summary shape and
//! writes it as a pretty-printed JSON file:
//!
//! ```text
//! {
//!   "photo-01.jpg": { "ratings": [5, 3], "average": 4.0, "notes": "sharp" },
//!   "photo-02.jpg": { "ratings": [], "average": 0.0 }
//! }
//! ```
//!
//! The same projection runs on live session state and on a stored
//! snapshot, so results can be exported without reloading the images.

mod export;
mod projection;

pub use export::{DEFAULT_EXPORT_FILE_NAME, export_file_name, results_to_json, write_results};
pub use projection::{ImageResult, ResultsByPath, project, project_results, project_snapshot};
