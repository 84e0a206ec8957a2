//! Exported results file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::projection::ResultsByPath;

/// File name used when no bundle name is known.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "image-ratings-results.json";

/// Name of the results file for a bundle: `<bundle stem>-results.json`.
///
/// Only the last extension is stripped (`trip.2024.zip` -> `trip.2024`).
/// Any directory part of the name is dropped, so the file always lands
/// directly in the export directory.
pub fn export_file_name(collection_name: Option<&str>) -> String {
    let Some(name) = collection_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
    else {
        return DEFAULT_EXPORT_FILE_NAME.to_string();
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    format!("{stem}-results.json")
}

/// Serialize results as pretty-printed JSON.
pub fn results_to_json(results: &ResultsByPath) -> Result<String> {
    serde_json::to_string_pretty(results).context("serialize results")
}

/// Write results into `dir` and return the file path.
pub fn write_results(
    dir: &Path,
    collection_name: Option<&str>,
    results: &ResultsByPath,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(export_file_name(collection_name));
    let json = results_to_json(results)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(images = results.len(), "Exported results to {}", path.display());
    Ok(path)
}
