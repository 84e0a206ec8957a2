//! Loaded images and the display handles issued for them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transient, process-local resource used to display an image.
///
/// Never persisted. Must be released through [`DisplayHandles::release`]
/// once the image it belongs to leaves the working collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    /// Raw identifier of the handle.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Registry of live display handles.
#[derive(Debug, Default)]
pub struct DisplayHandles {
    next_id: u64,
    live: BTreeSet<u64>,
}

impl DisplayHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new handle.
    pub fn issue(&mut self) -> DisplayHandle {
        self.next_id += 1;
        self.live.insert(self.next_id);
        DisplayHandle(self.next_id)
    }

    /// Release a handle. Returns `false` if it was not live.
    pub fn release(&mut self, handle: DisplayHandle) -> bool {
        self.live.remove(&handle.0)
    }

    /// Whether the handle is still live.
    pub fn is_live(&self, handle: DisplayHandle) -> bool {
        self.live.contains(&handle.0)
    }

    /// Number of handles issued and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// Persisted description of one image in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Path inside the source bundle (unique within a collection).
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, as Unix milliseconds.
    pub last_modified: i64,
}

/// One image of the working collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    /// Path inside the source bundle (unique within a collection).
    pub path: String,
    /// Encoded image bytes.
    pub content: Vec<u8>,
    /// Byte length of `content`.
    pub size: u64,
    /// Modification time recorded in the bundle.
    pub last_modified: DateTime<Utc>,
    display: Option<DisplayHandle>,
}

impl ImageHandle {
    /// Create an image handle. No display handle is issued until the image
    /// joins an [`ImageCollection`].
    pub fn new(path: impl Into<String>, content: Vec<u8>, last_modified: DateTime<Utc>) -> Self {
        let size = content.len() as u64;
        Self {
            path: path.into(),
            content,
            size,
            last_modified,
            display: None,
        }
    }

    /// The display handle, if this image is installed in a collection.
    pub fn display(&self) -> Option<DisplayHandle> {
        self.display
    }

    /// Metadata recorded in snapshots.
    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            path: self.path.clone(),
            size: self.size,
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}

/// The ordered working collection and the display handles it owns.
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<ImageHandle>,
    handles: DisplayHandles,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection.
    ///
    /// Every display handle of the previous images is released exactly once
    /// before the new images receive theirs.
    pub fn replace(&mut self, images: Vec<ImageHandle>) {
        let released = self.release_all();
        self.images = images;
        for image in &mut self.images {
            image.display = Some(self.handles.issue());
        }
        tracing::debug!(
            released,
            installed = self.images.len(),
            "replaced image collection"
        );
    }

    /// Release every display handle held by the current images.
    ///
    /// Returns the number of handles released. The images stay in place.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for image in &mut self.images {
            if let Some(handle) = image.display.take()
                && self.handles.release(handle)
            {
                released += 1;
            }
        }
        released
    }

    pub fn images(&self) -> &[ImageHandle] {
        &self.images
    }

    /// Mutable access for reordering. Handles travel with their images.
    pub fn images_mut(&mut self) -> &mut [ImageHandle] {
        &mut self.images
    }

    pub fn get(&self, index: usize) -> Option<&ImageHandle> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Paths in collection order.
    pub fn paths(&self) -> Vec<String> {
        self.images.iter().map(|i| i.path.clone()).collect()
    }

    /// Metadata in collection order.
    pub fn metadata(&self) -> Vec<ImageMetadata> {
        self.images.iter().map(ImageHandle::metadata).collect()
    }

    /// Number of live display handles.
    pub fn live_handles(&self) -> usize {
        self.handles.live_count()
    }
}
