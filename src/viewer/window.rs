use super::sequence_store::SequenceStore;
use crate::grouping::GroupedEntry;
use crate::source::{has_unterminated_line, split_lines};
use std::ops::Range;
use std::sync::Arc;

pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Outcome of applying a backward extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOlder {
    /// `count` entries were prepended to the window.
    Prepended { count: usize },
    /// Nothing older to show.
    AtStart,
    /// The first window entry is no longer in the store.
    LookupMiss,
    /// Another backward load is still pending.
    InFlight,
}

/// Keeps a contiguous window of the sequence store for rendering.
///
/// The window is seeded with the newest `chunk_size` entries, grows at the
/// front one chunk at a time as the user scrolls back, and grows at the back
/// with every tailed batch. It is never trimmed while tailing.
#[derive(Debug)]
pub struct WindowController {
    store: SequenceStore,
    window: Vec<Arc<GroupedEntry>>,
    chunk_size: usize,
    loading_older: bool,
}

impl Default for WindowController {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl WindowController {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            store: SequenceStore::new(),
            window: Vec::new(),
            chunk_size: chunk_size.max(1),
            loading_older: false,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    pub fn window(&self) -> &[Arc<GroupedEntry>] {
        &self.window
    }

    /// Forget the current resource entirely.
    pub fn clear(&mut self) {
        self.store.clear();
        self.window.clear();
        self.loading_older = false;
    }

    /// Regroup `raw_text` from scratch and show its newest chunk.
    pub fn load_initial(&mut self, raw_text: &str) {
        self.clear();
        self.store.append_lines(&split_lines(raw_text));
        if has_unterminated_line(raw_text) {
            self.store.mark_last_line_unterminated();
        }

        let end = self.store.len();
        let start = end.saturating_sub(self.chunk_size);
        self.window = self.store.slice(start..end);

        tracing::debug!(
            entries = end,
            window = self.window.len(),
            "loaded resource into window"
        );
    }

    /// Group only the newly appended lines and add them to both the store
    /// and the window. Returns the number of entries now at the end of the
    /// window that were not there before.
    ///
    /// If the initial load ended on an unfinished line, its entry is
    /// replaced by the regrouped one, which counts as new.
    pub fn append_tail<S: AsRef<str>>(&mut self, new_lines: &[S]) -> usize {
        if new_lines.is_empty() {
            return 0;
        }
        let reopened = if self.store.has_unterminated_line() {
            self.store.entries().last().map(|entry| entry.id)
        } else {
            None
        };
        let added = self.store.append_lines(new_lines);
        if let Some(id) = reopened
            && self.window.last().is_some_and(|entry| entry.id == id)
        {
            self.window.pop();
        }
        let count = added.len();
        self.window.extend(added);

        tracing::debug!(appended = count, window = self.window.len(), "tail appended");
        count
    }

    /// Whether there is anything before the window's first entry.
    pub fn can_load_older(&self) -> bool {
        self.window_start().is_some_and(|start| start > 0)
    }

    pub fn is_loading_older(&self) -> bool {
        self.loading_older
    }

    /// Mark a backward load as in flight. Returns false, changing nothing,
    /// when one is already pending or the window already starts at the
    /// beginning of the store.
    pub fn begin_load_older(&mut self) -> bool {
        if self.loading_older || !self.can_load_older() {
            return false;
        }
        self.loading_older = true;
        true
    }

    /// Prepend the chunk preceding the window.
    ///
    /// The window's first entry is looked up by id at call time. On anything
    /// but a successful prepend the in-flight flag is released here;
    /// otherwise it stays set until [`finish_load_older`](Self::finish_load_older).
    pub fn apply_load_older(&mut self) -> LoadOlder {
        let outcome = self.prepend_previous_chunk();
        if !matches!(outcome, LoadOlder::Prepended { .. }) {
            self.loading_older = false;
        }
        outcome
    }

    pub fn finish_load_older(&mut self) {
        self.loading_older = false;
    }

    /// Run a whole backward load in one step.
    pub fn load_older(&mut self) -> LoadOlder {
        if self.loading_older {
            return LoadOlder::InFlight;
        }
        self.loading_older = true;
        let outcome = self.prepend_previous_chunk();
        self.loading_older = false;
        outcome
    }

    /// `[start, end)` of the window within the store.
    pub fn range(&self) -> Option<Range<usize>> {
        self.window_start()
            .map(|start| start..start + self.window.len())
    }

    fn window_start(&self) -> Option<usize> {
        let first = self.window.first()?;
        self.store.position_of(first.id)
    }

    fn prepend_previous_chunk(&mut self) -> LoadOlder {
        let Some(first) = self.window.first() else {
            return LoadOlder::AtStart;
        };
        let Some(index) = self.store.position_of(first.id) else {
            tracing::debug!(id = %first.id, "window head not found in store, skipping backward load");
            return LoadOlder::LookupMiss;
        };
        if index == 0 {
            return LoadOlder::AtStart;
        }

        let new_start = index.saturating_sub(self.chunk_size);
        let mut older = self.store.slice(new_start..index);
        let count = older.len();
        older.append(&mut self.window);
        self.window = older;

        tracing::debug!(prepended = count, window = self.window.len(), "loaded older entries");
        LoadOlder::Prepended { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_older_aborts_when_head_vanished_from_store() {
        let mut controller = WindowController::new(2);
        controller.load_initial(
            "[2023-10-27 10:00:00] a\n[2023-10-27 10:00:01] b\n[2023-10-27 10:00:02] c\n",
        );
        controller.store.clear();

        assert_eq!(controller.load_older(), LoadOlder::LookupMiss);
        assert_eq!(controller.window().len(), 2);
        assert!(!controller.is_loading_older());
    }

    #[test]
    fn test_apply_releases_flag_on_lookup_miss() {
        let mut controller = WindowController::new(1);
        controller.load_initial("[2023-10-27 10:00:00] a\n[2023-10-27 10:00:01] b\n");
        assert!(controller.begin_load_older());

        controller.store.clear();
        assert_eq!(controller.apply_load_older(), LoadOlder::LookupMiss);
        assert!(!controller.is_loading_older());
    }
}
