//! Restoring a collection to a saved order.

use std::collections::{HashMap, HashSet};

use crate::compat::CollectionEntry;

/// Reorder `images` so their paths follow `saved_order`.
///
/// All or nothing: when the lengths differ, a saved path is missing, or the
/// saved order names an image twice, `images` is returned unchanged and a
/// warning is logged. Never returns a partially reordered or truncated list.
pub fn reconcile<T: CollectionEntry>(images: Vec<T>, saved_order: &[String]) -> Vec<T> {
    if saved_order.len() != images.len() {
        tracing::warn!(
            saved = saved_order.len(),
            loaded = images.len(),
            "Saved image order length differs from loaded collection; keeping loaded order"
        );
        return images;
    }

    let Some(positions) = saved_positions(&images, saved_order) else {
        return images;
    };

    let mut slots: Vec<Option<T>> = images.into_iter().map(Some).collect();
    positions
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

/// Index into `images` of each saved path, or `None` if the saved order is
/// not a permutation of the loaded paths.
fn saved_positions<T: CollectionEntry>(images: &[T], saved_order: &[String]) -> Option<Vec<usize>> {
    let lookup: HashMap<&str, usize> = images
        .iter()
        .enumerate()
        .map(|(index, image)| (image.entry_path(), index))
        .collect();

    let mut positions = Vec::with_capacity(saved_order.len());
    let mut seen = HashSet::with_capacity(saved_order.len());
    for path in saved_order {
        let Some(&index) = lookup.get(path.as_str()) else {
            tracing::warn!(%path, "Saved image missing from loaded collection; keeping loaded order");
            return None;
        };
        if !seen.insert(index) {
            tracing::warn!(%path, "Image appears twice in saved order; keeping loaded order");
            return None;
        }
        positions.push(index);
    }
    Some(positions)
}
