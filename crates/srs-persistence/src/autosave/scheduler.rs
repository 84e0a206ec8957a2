//! Debounced auto-save scheduling.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use srs_model::{ImageMetadata, NotesByPath, RatingsByPath, SessionId};

use super::{AutoSaveConfig, SaveTracker};
use crate::storage::StorageBackend;
use crate::store::SnapshotStore;

/// Everything a save writes, captured from the live session.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePayload {
    pub session_id: SessionId,
    pub current_index: usize,
    pub ratings: RatingsByPath,
    pub notes: NotesByPath,
    /// Images in collection order.
    pub images: Vec<ImageMetadata>,
    pub collection_name: String,
}

impl SavePayload {
    fn write_to<B: StorageBackend>(&self, store: &SnapshotStore<B>) -> Option<DateTime<Utc>> {
        store.save(
            &self.session_id,
            self.current_index,
            &self.ratings,
            &self.notes,
            &self.images,
            &self.collection_name,
        )
    }
}

#[derive(Debug, Default)]
struct Shared {
    /// The most recent session state. Read when a save fires, never when it
    /// is scheduled.
    latest: Mutex<Option<SavePayload>>,
    tracker: Mutex<SaveTracker>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write the held payload now. Does nothing for an empty collection.
fn fire<B: StorageBackend>(store: &SnapshotStore<B>, shared: &Shared) -> Option<DateTime<Utc>> {
    let payload = lock(&shared.latest).clone()?;
    if payload.images.is_empty() {
        return None;
    }
    let saved = payload.write_to(store);
    let mut tracker = lock(&shared.tracker);
    match saved {
        Some(at) => tracker.save_complete(at),
        None => tracker.save_failed(),
    }
    saved
}

/// Coalesces bursts of session mutations into one snapshot write.
///
/// Each [`arm`](Self::arm) replaces the held payload and restarts the quiet
/// period; only a timer that runs out uninterrupted writes. The write reads
/// the held payload at fire time, so it always reflects the latest mutation.
/// [`flush_now`](Self::flush_now) bypasses the timer for manual saves and
/// shutdown.
///
/// Timers run on the current Tokio runtime. Without one, `arm` saves
/// immediately. Dropping the scheduler with unsaved changes flushes them.
#[derive(Debug)]
pub struct AutoSaveScheduler<B: StorageBackend + 'static> {
    store: Arc<SnapshotStore<B>>,
    config: AutoSaveConfig,
    shared: Arc<Shared>,
    timer: Option<JoinHandle<()>>,
}

impl<B: StorageBackend + 'static> AutoSaveScheduler<B> {
    pub fn new(store: Arc<SnapshotStore<B>>, config: AutoSaveConfig) -> Self {
        Self {
            store,
            config,
            shared: Arc::default(),
            timer: None,
        }
    }

    pub fn config(&self) -> &AutoSaveConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SnapshotStore<B>> {
        &self.store
    }

    /// Replace the held payload without scheduling a write.
    pub fn update(&self, payload: SavePayload) {
        *lock(&self.shared.latest) = Some(payload);
        lock(&self.shared.tracker).mark_dirty();
    }

    /// Hold `payload` and restart the quiet period.
    ///
    /// Does nothing for an empty collection.
    pub fn arm(&mut self, payload: SavePayload) {
        if payload.images.is_empty() {
            return;
        }
        self.update(payload);
        if !self.config.enabled {
            return;
        }
        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("No async runtime; saving without debounce");
            fire(&*self.store, &self.shared);
            return;
        };

        let deadline = Instant::now() + self.config.debounce();
        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.shared);
        self.timer = Some(runtime.spawn(async move {
            sleep_until(deadline).await;
            fire(&*store, &shared);
        }));
        tracing::debug!(debounce_ms = self.config.debounce_ms, "Auto-save armed");
    }

    /// Cancel a pending, not yet fired save.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Save the held payload immediately, cancelling any pending timer.
    ///
    /// Returns the write time, or `None` when nothing was written (empty
    /// collection, nothing held, or a swallowed storage failure).
    pub fn flush_now(&mut self) -> Option<DateTime<Utc>> {
        self.cancel();
        fire(&*self.store, &self.shared)
    }

    /// Whether a debounced save is waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Whether changes have been held since the last successful save.
    pub fn is_dirty(&self) -> bool {
        lock(&self.shared.tracker).is_dirty()
    }

    /// When the last save, debounced or manual, completed.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.shared.tracker).last_saved_at()
    }

    /// Copy of the save bookkeeping.
    pub fn tracker(&self) -> SaveTracker {
        lock(&self.shared.tracker).clone()
    }
}

impl<B: StorageBackend + 'static> Drop for AutoSaveScheduler<B> {
    fn drop(&mut self) {
        if self.is_dirty() {
            tracing::debug!("Flushing unsaved changes on drop");
            self.flush_now();
        } else {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::time::Duration;
    use tokio::time::sleep;

    fn payload(index: usize, paths: &[&str]) -> SavePayload {
        SavePayload {
            session_id: SessionId::from("session_test".to_string()),
            current_index: index,
            ratings: RatingsByPath::new(),
            notes: NotesByPath::new(),
            images: paths
                .iter()
                .map(|p| ImageMetadata {
                    path: (*p).to_string(),
                    size: 1,
                    last_modified: 0,
                })
                .collect(),
            collection_name: "set.zip".to_string(),
        }
    }

    fn scheduler() -> (Arc<SnapshotStore<MemoryStorage>>, AutoSaveScheduler<MemoryStorage>) {
        let store = Arc::new(SnapshotStore::new(MemoryStorage::new()));
        let scheduler = AutoSaveScheduler::new(Arc::clone(&store), AutoSaveConfig::default());
        (store, scheduler)
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_quiet_period() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &["a"]));
        assert!(scheduler.has_pending());

        sleep(Duration::from_millis(1999)).await;
        assert_eq!(store.backend().write_count(), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(store.backend().write_count(), 1);
        assert!(scheduler.last_saved_at().is_some());
        assert!(!scheduler.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_last_payload() {
        let (store, mut scheduler) = scheduler();
        for index in 0..5 {
            scheduler.arm(payload(index, &["a", "b", "c", "d", "e"]));
            sleep(Duration::from_millis(500)).await;
        }
        assert_eq!(store.backend().write_count(), 0);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(store.backend().write_count(), 1);
        assert_eq!(store.load().unwrap().current_image_index, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_reads_latest_held_state() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &["a", "b"]));
        scheduler.update(payload(1, &["a", "b"]));

        sleep(Duration::from_secs(3)).await;
        assert_eq!(store.load().unwrap().current_image_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_write() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &["a"]));
        scheduler.cancel();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.backend().write_count(), 0);
        assert!(scheduler.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_bypasses_debounce() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(2, &["a", "b", "c"]));

        assert!(scheduler.flush_now().is_some());
        assert_eq!(store.backend().write_count(), 1);

        // The pending timer was cancelled by the flush.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.backend().write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_collection_is_noop() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &[]));
        assert!(!scheduler.has_pending());
        assert!(scheduler.flush_now().is_none());

        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.backend().write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_only_saves_on_flush() {
        let store = Arc::new(SnapshotStore::new(MemoryStorage::new()));
        let mut scheduler = AutoSaveScheduler::new(Arc::clone(&store), AutoSaveConfig::disabled());
        scheduler.arm(payload(0, &["a"]));

        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.backend().write_count(), 0);

        scheduler.flush_now();
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_without_runtime_saves_immediately() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &["a"]));
        assert_eq!(store.backend().write_count(), 1);
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_writes_pending_save() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(1, &["a", "b"]));
        assert!(scheduler.has_pending());
        drop(scheduler);

        assert_eq!(store.backend().write_count(), 1);
        assert_eq!(store.load().unwrap().current_image_index, 1);

        // The aborted timer does not write a second time.
        sleep(Duration::from_secs(5)).await;
        assert_eq!(store.backend().write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_after_save_does_not_rewrite() {
        let (store, mut scheduler) = scheduler();
        scheduler.arm(payload(0, &["a"]));
        sleep(Duration::from_secs(3)).await;
        assert_eq!(store.backend().write_count(), 1);

        drop(scheduler);
        assert_eq!(store.backend().write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_keeps_dirty() {
        let store = Arc::new(SnapshotStore::new(MemoryStorage::with_quota(8)));
        let mut scheduler = AutoSaveScheduler::new(Arc::clone(&store), AutoSaveConfig::default());
        scheduler.arm(payload(0, &["a"]));

        assert!(scheduler.flush_now().is_none());
        assert!(scheduler.is_dirty());
        assert_eq!(scheduler.tracker().consecutive_failures(), 1);
    }
}
