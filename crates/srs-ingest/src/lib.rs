//! Image bundle extraction.
//!
//! Turns a zip archive into the ordered image collection a rating session
//! works on.
//!
//! # Features
//!
//! - **Extension filter**: jpg, jpeg, png, gif, bmp, webp, svg (case-insensitive)
//! - **Content sniffing**: entries whose bytes do not look like their image
//!   type are skipped with a warning, as are unreadable entries
//! - **Ordering**: lexicographic by path, or a uniform shuffle
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use srs_ingest::{bundle_name, load_bundle};
//!
//! let path = Path::new("holiday.zip");
//! let images = load_bundle(path, false)?;
//! let name = bundle_name(path);
//! ```

mod error;
mod extract;
mod format;

// === Error Types ===
pub use error::{IngestError, Result};

// === Extraction ===
pub use extract::{bundle_name, extract_bundle, extract_bundle_with_rng, load_bundle};

// === Format Detection ===
pub use format::{ImageFormat, SUPPORTED_EXTENSIONS};
