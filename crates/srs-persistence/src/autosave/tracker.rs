//! Save bookkeeping for auto-save.

use chrono::{DateTime, Utc};

/// Tracks unsaved changes and completed saves.
///
/// Backs the "unsaved changes" indicator and the "last saved" time.
#[derive(Debug, Clone, Default)]
pub struct SaveTracker {
    /// Whether there are unsaved changes.
    dirty: bool,

    /// When the last successful save was written.
    last_saved_at: Option<DateTime<Utc>>,

    /// Number of successful saves.
    save_count: u64,

    /// Number of failed saves since the last success.
    consecutive_failures: u32,
}

impl SaveTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record a change that has not been saved yet.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Record a successful save.
    pub fn save_complete(&mut self, at: DateTime<Utc>) {
        self.dirty = false;
        self.last_saved_at = Some(at);
        self.save_count += 1;
        self.consecutive_failures = 0;
    }

    /// Record a failed save. The changes stay dirty.
    pub fn save_failed(&mut self) {
        self.consecutive_failures += 1;
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    pub fn save_count(&self) -> u64 {
        self.save_count
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = SaveTracker::new();
        assert!(!tracker.is_dirty());
        assert!(tracker.last_saved_at().is_none());
        assert_eq!(tracker.save_count(), 0);
    }

    #[test]
    fn test_save_complete() {
        let mut tracker = SaveTracker::new();
        tracker.mark_dirty();
        assert!(tracker.is_dirty());

        let at = Utc::now();
        tracker.save_complete(at);
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.last_saved_at(), Some(at));
        assert_eq!(tracker.save_count(), 1);
    }

    #[test]
    fn test_save_failed() {
        let mut tracker = SaveTracker::new();
        tracker.mark_dirty();
        tracker.save_failed();
        tracker.save_failed();

        assert!(tracker.is_dirty()); // Still dirty
        assert_eq!(tracker.consecutive_failures(), 2);

        tracker.save_complete(Utc::now());
        assert_eq!(tracker.consecutive_failures(), 0);
    }
}
