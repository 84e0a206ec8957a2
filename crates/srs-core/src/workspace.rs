//! Live session state wired to persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use srs_model::{
    ImageCollection, ImageHandle, ModelError, NotesByPath, Rating, RatingValue, RatingsByPath,
    SessionId,
};
use srs_persistence::{
    AutoSaveConfig, AutoSaveScheduler, SavePayload, SnapshotStore, StorageBackend, prepare_restore,
};
use srs_results::{ResultsByPath, project_results};

use crate::error::{CoreError, Result};

/// One rating session.
///
/// Owns the working collection and its display handles. Every mutation
/// hands the full session state to the auto-save scheduler, which writes it
/// once activity pauses.
#[derive(Debug)]
pub struct Workspace<B: StorageBackend + 'static> {
    store: Arc<SnapshotStore<B>>,
    autosave: AutoSaveScheduler<B>,
    session_id: SessionId,
    collection: ImageCollection,
    collection_name: Option<String>,
    current_index: usize,
    ratings: RatingsByPath,
    notes: NotesByPath,
}

impl<B: StorageBackend + 'static> Workspace<B> {
    /// Create an empty workspace with a new session id.
    pub fn new(store: Arc<SnapshotStore<B>>, autosave: AutoSaveConfig) -> Self {
        let session_id = SessionId::generate();
        debug!(session = %session_id, "Created workspace");
        Self {
            autosave: AutoSaveScheduler::new(Arc::clone(&store), autosave),
            store,
            session_id,
            collection: ImageCollection::new(),
            collection_name: None,
            current_index: 0,
            ratings: RatingsByPath::new(),
            notes: NotesByPath::new(),
        }
    }

    // === Accessors ===

    pub fn store(&self) -> &Arc<SnapshotStore<B>> {
        &self.store
    }

    pub fn autosave(&self) -> &AutoSaveScheduler<B> {
        &self.autosave
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    /// Name of the bundle the collection came from, if known.
    pub fn collection_name(&self) -> Option<&str> {
        self.collection_name.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The image at the current index.
    pub fn current_image(&self) -> Option<&ImageHandle> {
        self.collection.get(self.current_index)
    }

    pub fn ratings(&self) -> &RatingsByPath {
        &self.ratings
    }

    pub fn notes(&self) -> &NotesByPath {
        &self.notes
    }

    /// Ratings of one image, oldest first.
    pub fn ratings_for(&self, path: &str) -> &[Rating] {
        self.ratings.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Note of one image; empty when none was written.
    pub fn note_for(&self, path: &str) -> &str {
        self.notes.get(path).map(String::as_str).unwrap_or_default()
    }

    /// Number of images with at least one rating.
    pub fn rated_images(&self) -> usize {
        self.collection
            .images()
            .iter()
            .filter(|image| !self.ratings_for(&image.path).is_empty())
            .count()
    }

    /// When progress was last written.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.autosave.last_saved_at()
    }

    // === Loading ===

    /// Start a new session on `images`, discarding stored progress.
    ///
    /// An empty collection is rejected without touching any state.
    pub fn load_fresh(&mut self, images: Vec<ImageHandle>, name: Option<String>) -> Result<()> {
        if images.is_empty() {
            return Err(CoreError::EmptyCollection);
        }
        self.autosave.cancel();
        self.collection.replace(images);
        self.collection_name = name;
        self.current_index = 0;
        self.ratings.clear();
        self.notes.clear();
        self.store.clear();

        info!(
            images = self.collection.len(),
            collection = self.collection_name.as_deref().unwrap_or_default(),
            "Started new rating session"
        );
        self.touch();
        Ok(())
    }

    /// Resume stored progress on a re-supplied collection.
    ///
    /// The collection is reordered into the saved sequence before it is
    /// compared with the snapshot. On any error neither the live state nor
    /// the stored snapshot changes.
    pub fn restore(&mut self, images: Vec<ImageHandle>) -> Result<()> {
        if images.is_empty() {
            return Err(CoreError::EmptyCollection);
        }
        let snapshot = self.store.load().ok_or(CoreError::NothingToRestore)?;
        let images = prepare_restore(&snapshot, images)?;

        self.autosave.cancel();
        self.collection.replace(images);
        self.collection_name = snapshot.collection_name().map(str::to_string);
        self.current_index = snapshot
            .current_image_index
            .min(self.collection.len().saturating_sub(1));
        self.ratings = snapshot.image_ratings;
        self.notes = snapshot.image_notes;

        info!(
            images = self.collection.len(),
            rated = self.rated_images(),
            index = self.current_index,
            saved_by = %snapshot.session_id,
            "Restored saved progress"
        );
        self.autosave.update(self.payload());
        Ok(())
    }

    // === Ratings ===

    /// Add a rating to the current image.
    pub fn rate(&mut self, value: u8) -> Result<Rating> {
        let path = self.current_path()?;
        self.rate_image(&path, value)
    }

    /// Add a rating to the image at `path`.
    pub fn rate_image(&mut self, path: &str, value: u8) -> Result<Rating> {
        let value = RatingValue::new(value)?;
        self.ensure_known(path)?;
        let rating = Rating::new(value);
        self.ratings
            .entry(path.to_string())
            .or_default()
            .push(rating.clone());
        debug!(path, value = value.get(), "Rated image");
        self.touch();
        Ok(rating)
    }

    /// Change the value of an existing rating.
    pub fn edit_rating(&mut self, path: &str, id: &str, value: u8) -> Result<()> {
        let value = RatingValue::new(value)?;
        let rating = self
            .ratings
            .get_mut(path)
            .and_then(|ratings| ratings.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| rating_not_found(path, id))?;
        rating.value = value;
        self.touch();
        Ok(())
    }

    /// Remove one rating.
    pub fn delete_rating(&mut self, path: &str, id: &str) -> Result<Rating> {
        let ratings = self
            .ratings
            .get_mut(path)
            .ok_or_else(|| rating_not_found(path, id))?;
        let position = ratings
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| rating_not_found(path, id))?;
        let removed = ratings.remove(position);
        if ratings.is_empty() {
            self.ratings.remove(path);
        }
        self.touch();
        Ok(removed)
    }

    /// Remove the most recent rating of the current image.
    ///
    /// Returns `None` when the image has no ratings.
    pub fn undo_last_rating(&mut self) -> Result<Option<Rating>> {
        let path = self.current_path()?;
        let Some(ratings) = self.ratings.get_mut(&path) else {
            return Ok(None);
        };
        let removed = ratings.pop();
        if ratings.is_empty() {
            self.ratings.remove(&path);
        }
        if removed.is_some() {
            self.touch();
        }
        Ok(removed)
    }

    // === Notes ===

    /// Replace the note of the current image. Empty text removes it.
    pub fn set_note(&mut self, text: impl Into<String>) -> Result<()> {
        let path = self.current_path()?;
        let text = text.into();
        if text.is_empty() {
            self.notes.remove(&path);
        } else {
            self.notes.insert(path, text);
        }
        self.touch();
        Ok(())
    }

    // === Navigation ===

    /// Jump to the image at `index`.
    pub fn go_to(&mut self, index: usize) -> Result<()> {
        let len = self.collection.len();
        if index >= len {
            return Err(ModelError::IndexOutOfRange { index, len }.into());
        }
        if index != self.current_index {
            self.current_index = index;
            self.touch();
        }
        Ok(())
    }

    /// Move to the next image. Returns `false` at the end of the collection.
    pub fn next(&mut self) -> bool {
        if self.current_index + 1 >= self.collection.len() {
            return false;
        }
        self.current_index += 1;
        self.touch();
        true
    }

    /// Move to the previous image. Returns `false` at the start.
    pub fn previous(&mut self) -> bool {
        if self.current_index == 0 || self.collection.is_empty() {
            return false;
        }
        self.current_index -= 1;
        self.touch();
        true
    }

    /// Put the collection in a new random order, keeping the current image
    /// selected.
    pub fn shuffle_order(&mut self) -> Result<()> {
        self.shuffle_order_with_rng(&mut rand::thread_rng())
    }

    /// [`shuffle_order`](Self::shuffle_order) with a caller-supplied random
    /// source.
    pub fn shuffle_order_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let current = self.current_path()?;
        self.collection.images_mut().shuffle(rng);
        self.current_index = self
            .collection
            .images()
            .iter()
            .position(|image| image.path == current)
            .unwrap_or(0);
        debug!(index = self.current_index, "Shuffled collection order");
        self.touch();
        Ok(())
    }

    // === Results and durability ===

    /// Exportable results of the live session.
    pub fn results(&self) -> ResultsByPath {
        project_results(&self.ratings, &self.notes)
    }

    /// Save immediately, bypassing the debounce.
    ///
    /// Returns the write time, or `None` when nothing was written.
    pub fn save_now(&mut self) -> Option<DateTime<Utc>> {
        self.autosave.update(self.payload());
        self.autosave.flush_now()
    }

    /// End the session: flush unconditionally, then release every display
    /// handle. The images stay loaded but can no longer be displayed.
    pub fn shutdown(&mut self) -> Option<DateTime<Utc>> {
        let saved = self.save_now();
        let released = self.collection.release_all();
        info!(released, saved = saved.is_some(), "Closed rating session");
        saved
    }

    fn payload(&self) -> SavePayload {
        SavePayload {
            session_id: self.session_id.clone(),
            current_index: self.current_index,
            ratings: self.ratings.clone(),
            notes: self.notes.clone(),
            images: self.collection.metadata(),
            collection_name: self.collection_name.clone().unwrap_or_default(),
        }
    }

    /// Hand the current state to the scheduler and restart its quiet period.
    fn touch(&mut self) {
        let payload = self.payload();
        self.autosave.arm(payload);
    }

    fn current_path(&self) -> Result<String> {
        self.current_image()
            .map(|image| image.path.clone())
            .ok_or(CoreError::NoCollection)
    }

    fn ensure_known(&self, path: &str) -> Result<()> {
        if self.collection.images().iter().any(|image| image.path == path) {
            Ok(())
        } else {
            Err(CoreError::UnknownImage {
                path: path.to_string(),
            })
        }
    }
}

fn rating_not_found(path: &str, id: &str) -> CoreError {
    ModelError::RatingNotFound {
        path: path.to_string(),
        id: id.to_string(),
    }
    .into()
}
