//! Zip bundle extraction.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use srs_model::ImageHandle;

use crate::error::{IngestError, Result};
use crate::format::ImageFormat;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

/// Read a bundle from disk and extract its images.
pub fn load_bundle(path: &Path, shuffle: bool) -> Result<Vec<ImageHandle>> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read bundle");
    extract_bundle(&bytes, shuffle)
}

/// Display name of a bundle: its file name.
pub fn bundle_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

/// Extract images from zip bytes.
///
/// Images come back sorted by path, or uniformly shuffled when `shuffle` is
/// set.
pub fn extract_bundle(bytes: &[u8], shuffle: bool) -> Result<Vec<ImageHandle>> {
    extract_bundle_with_rng(bytes, shuffle, &mut rand::thread_rng())
}

/// [`extract_bundle`] with a caller-supplied random source.
pub fn extract_bundle_with_rng<R: Rng + ?Sized>(
    bytes: &[u8],
    shuffle: bool,
    rng: &mut R,
) -> Result<Vec<ImageHandle>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let extracted_at = Utc::now();
    let mut images = Vec::new();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(index, %error, "Skipping unreadable archive entry");
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let Some(format) = ImageFormat::from_path(&name) else {
            debug!(path = %name, "Skipping non-image entry");
            continue;
        };

        let mut content = Vec::with_capacity(prealloc_hint(entry.size()));
        if let Err(error) = entry.read_to_end(&mut content) {
            warn!(path = %name, %error, "Skipping image that could not be read");
            continue;
        }
        if !format.matches(&content) {
            warn!(path = %name, ?format, "Skipping image that could not be decoded");
            continue;
        }

        let modified = entry
            .last_modified()
            .and_then(zip_time_to_utc)
            .unwrap_or(extracted_at);
        images.push(ImageHandle::new(name, content, modified));
    }

    if images.is_empty() {
        return Err(IngestError::NoImages);
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));
    if shuffle {
        images.shuffle(rng);
    }

    info!(images = images.len(), shuffle, "Extracted bundle");
    Ok(images)
}

/// Initial buffer size for an entry. The declared size is untrusted.
fn prealloc_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOC, |size| size.min(MAX_PREALLOC))
}

fn zip_time_to_utc(time: zip::DateTime) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )?
    .and_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )
    .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nbody";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00];

    fn build_zip(dirs: &[&str], files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for dir in dirs {
                writer.add_directory(*dir, options).unwrap();
            }
            for (name, content) in files {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer
    }

    fn paths(images: &[ImageHandle]) -> Vec<&str> {
        images.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_filters_and_sorts() {
        let bytes = build_zip(
            &["photos/"],
            &[
                ("photos/c.png", PNG),
                ("readme.txt", b"hello"),
                ("A.JPG", JPEG),
                ("photos/b.Png", PNG),
            ],
        );

        let images = extract_bundle(&bytes, false).unwrap();
        assert_eq!(paths(&images), vec!["A.JPG", "photos/b.Png", "photos/c.png"]);
        assert_eq!(images[0].content, JPEG);
        assert_eq!(images[1].size, PNG.len() as u64);
    }

    #[test]
    fn test_undecodable_entry_is_skipped() {
        let bytes = build_zip(&[], &[("fake.png", b"plain text"), ("real.png", PNG)]);
        let images = extract_bundle(&bytes, false).unwrap();
        assert_eq!(paths(&images), vec!["real.png"]);
    }

    #[test]
    fn test_no_images_is_an_error() {
        let bytes = build_zip(&["empty/"], &[("notes.txt", b"x")]);
        assert!(matches!(
            extract_bundle(&bytes, false),
            Err(IngestError::NoImages)
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_bundle(b"definitely not a zip", false),
            Err(IngestError::Archive { .. })
        ));
    }

    #[test]
    fn test_shuffle_keeps_every_image() {
        let names: Vec<String> = (0..20).map(|i| format!("img{i:02}.png")).collect();
        let files: Vec<(&str, &[u8])> = names.iter().map(|n| (n.as_str(), PNG)).collect();
        let bytes = build_zip(&[], &files);

        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = extract_bundle_with_rng(&bytes, true, &mut rng).unwrap();

        let mut sorted = paths(&shuffled);
        sorted.sort_unstable();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_load_bundle_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holiday.zip");
        fs::write(&path, build_zip(&[], &[("one.png", PNG)])).unwrap();

        let images = load_bundle(&path, false).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(bundle_name(&path).as_deref(), Some("holiday.zip"));
    }

    #[test]
    fn test_declared_size_only_caps_the_reservation() {
        assert_eq!(prealloc_hint(0), 0);
        assert_eq!(prealloc_hint(4096), 4096);
        assert_eq!(prealloc_hint(u64::MAX), MAX_PREALLOC);
        assert_eq!(prealloc_hint(MAX_PREALLOC as u64 + 1), MAX_PREALLOC);
    }

    #[test]
    fn test_load_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_bundle(&dir.path().join("missing.zip"), false);
        assert!(matches!(result, Err(IngestError::FileRead { .. })));
    }
}
