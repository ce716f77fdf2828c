//! Dirty state tracking for write-through saves.

/// Tracks whether the in-memory store is ahead of what was last saved.
///
/// Every committed mutation marks the store dirty and triggers a save. A
/// successful save clears the flag; a failed one keeps it so the caller can
/// retry with [`crate::OptionStore::flush`].
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Whether there are unsaved changes.
    dirty: bool,

    /// Saves that failed since the last successful one.
    consecutive_failures: u32,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of failed saves since the last success.
    #[inline]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Mark the store as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Mark that a save has completed successfully.
    pub fn save_complete(&mut self) {
        self.dirty = false;
        self.consecutive_failures = 0;
    }

    /// Mark that a save has failed.
    pub fn save_failed(&mut self) {
        self.consecutive_failures += 1;
        // Keep dirty = true since save failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = DirtyTracker::new();
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn test_save_complete() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        assert!(tracker.is_dirty());

        tracker.save_complete();
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn test_save_failed_stays_dirty() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        tracker.save_failed();
        tracker.save_failed();

        assert!(tracker.is_dirty());
        assert_eq!(tracker.consecutive_failures(), 2);

        tracker.save_complete();
        assert_eq!(tracker.consecutive_failures(), 0);
    }
}
