use std::sync::Arc;

/// The reader's cursor into the open document's words.
///
/// The index is always a valid word index, or 0 when there are no words.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    words: Arc<[String]>,
    index: usize,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::empty()
    }
}

impl PositionTracker {
    /// Cursor over `words`, starting at `index` clamped into range.
    pub fn new(words: Arc<[String]>, index: usize) -> Self {
        let mut tracker = Self { words, index: 0 };
        tracker.index = tracker.clamp(index);
        tracker
    }

    /// Cursor over no words at all.
    pub fn empty() -> Self {
        Self {
            words: Arc::from(Vec::new()),
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &Arc<[String]> {
        &self.words
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.index).map(String::as_str)
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.words.len().saturating_sub(1))
    }

    /// Jump to `index`, clamped into `[0, len - 1]`. Returns the new index.
    pub fn seek(&mut self, index: i64) -> usize {
        self.index = if index <= 0 {
            0
        } else {
            self.clamp(usize::try_from(index).unwrap_or(usize::MAX))
        };
        self.index
    }

    /// Move by `delta` words, clamped. Returns the new index.
    pub fn move_by(&mut self, delta: i64) -> usize {
        let target = i64::try_from(self.index)
            .unwrap_or(i64::MAX)
            .saturating_add(delta);
        self.seek(target)
    }

    pub fn step_forward(&mut self) -> usize {
        self.move_by(1)
    }

    pub fn step_backward(&mut self) -> usize {
        self.move_by(-1)
    }

    /// Advance one word for a playback tick.
    ///
    /// Returns `false`, leaving the cursor on the last word, when the
    /// advance would run past the end.
    pub(crate) fn advance(&mut self) -> bool {
        if self.index + 1 >= self.words.len() {
            self.index = self.clamp(self.index);
            return false;
        }
        self.index += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn tracker(len: usize, index: usize) -> PositionTracker {
        let words: Vec<String> = (0..len).map(|i| format!("w{i}")).collect();
        PositionTracker::new(words.into(), index)
    }

    #[test]
    fn test_seek_clamps() {
        let mut pos = tracker(100, 0);
        assert_eq!(pos.seek(-5), 0);
        assert_eq!(pos.seek(500), 99);
        assert_eq!(pos.seek(42), 42);
        assert_eq!(pos.current_word(), Some("w42"));
    }

    #[test]
    fn test_new_clamps_saved_position() {
        assert_eq!(tracker(3, 10).index(), 2);
    }

    #[test]
    fn test_steps_stop_at_bounds() {
        let mut pos = tracker(2, 0);
        assert_eq!(pos.step_backward(), 0);
        assert_eq!(pos.step_forward(), 1);
        assert_eq!(pos.step_forward(), 1);
    }

    #[test]
    fn test_empty_tracker() {
        let mut pos = PositionTracker::empty();
        assert_eq!(pos.seek(10), 0);
        assert_eq!(pos.current_word(), None);
        assert!(!pos.advance());
    }

    #[test]
    fn test_advance_stops_on_last_word() {
        let mut pos = tracker(2, 0);
        assert!(pos.advance());
        assert!(!pos.advance());
        assert_eq!(pos.index(), 1);
    }

    proptest! {
        #[test]
        fn prop_seek_always_in_bounds(len in 1usize..500, target in any::<i64>()) {
            let mut pos = tracker(len, 0);
            let index = pos.seek(target);
            prop_assert!(index < len);
            if target < 0 {
                prop_assert_eq!(index, 0);
            } else if target as u64 >= len as u64 {
                prop_assert_eq!(index, len - 1);
            } else {
                prop_assert_eq!(index, target as usize);
            }
        }

        #[test]
        fn prop_move_by_in_bounds(len in 1usize..200, start in 0usize..200, delta in -400i64..400) {
            let mut pos = tracker(len, start);
            prop_assert!(pos.move_by(delta) < len);
        }
    }
}
