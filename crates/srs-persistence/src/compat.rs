//! Collection compatibility checking.

use srs_model::{ImageHandle, ImageMetadata};

/// Anything that identifies one image of a collection by path and size.
pub trait CollectionEntry {
    fn entry_path(&self) -> &str;
    fn entry_size(&self) -> u64;
}

impl CollectionEntry for ImageHandle {
    fn entry_path(&self) -> &str {
        &self.path
    }

    fn entry_size(&self) -> u64 {
        self.size
    }
}

impl CollectionEntry for ImageMetadata {
    fn entry_path(&self) -> &str {
        &self.path
    }

    fn entry_size(&self) -> u64 {
        self.size
    }
}

/// Whether `current` is the collection `stored` was recorded from.
///
/// The comparison is positional: equal length, and at every index the same
/// path and byte size. Contents are not hashed, so two different files that
/// share path and size are taken to be the same image. A reordered copy of
/// the same collection is incompatible until reconciled.
pub fn is_compatible<S, C>(stored: &[S], current: &[C]) -> bool
where
    S: CollectionEntry,
    C: CollectionEntry,
{
    stored.len() == current.len()
        && stored.iter().zip(current).all(|(s, c)| {
            s.entry_path() == c.entry_path() && s.entry_size() == c.entry_size()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(path: &str, size: u64) -> ImageMetadata {
        ImageMetadata {
            path: path.to_string(),
            size,
            last_modified: 0,
        }
    }

    #[test]
    fn test_identical_collections() {
        let a = vec![meta("a.png", 1), meta("b.png", 2)];
        assert!(is_compatible(&a, &a.clone()));
    }

    #[test]
    fn test_length_difference() {
        let a = vec![meta("a.png", 1), meta("b.png", 2)];
        assert!(!is_compatible(&a, &a[..1]));
    }

    #[test]
    fn test_size_difference() {
        let a = vec![meta("a.png", 1)];
        let b = vec![meta("a.png", 3)];
        assert!(!is_compatible(&a, &b));
    }

    #[test]
    fn test_order_matters() {
        let a = vec![meta("a.png", 1), meta("b.png", 1)];
        let b = vec![meta("b.png", 1), meta("a.png", 1)];
        assert!(!is_compatible(&a, &b));
    }

    #[test]
    fn test_modification_time_ignored() {
        let a = vec![meta("a.png", 1)];
        let mut b = a.clone();
        b[0].last_modified = 42;
        assert!(is_compatible(&a, &b));
    }

    #[test]
    fn test_empty_collections() {
        let empty: Vec<ImageMetadata> = Vec::new();
        assert!(is_compatible(&empty, &empty));
    }
}
