use crate::grouping::{EntryId, GroupedEntry, IdCounter, group};
use crate::stats::LogStats;
use std::ops::Range;
use std::sync::Arc;

/// Authoritative, append-only sequence of every entry grouped so far for the
/// open resource.
#[derive(Debug, Default)]
pub struct SequenceStore {
    entries: Vec<Arc<GroupedEntry>>,
    ids: IdCounter,
    raw_line_count: usize,
    /// The last stored line was read before its `\n` was written.
    unterminated: bool,
    stats: LogStats,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything, including the id counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.ids.reset();
        self.raw_line_count = 0;
        self.unterminated = false;
        self.stats.clear();
    }

    /// Group `lines` as the continuation of the stored sequence and append
    /// the result. Returns the newly created entries.
    ///
    /// When the last stored line was unfinished, the first of `lines` is its
    /// finished form: the last entry is taken out and regrouped together with
    /// `lines`, and comes back under a new id at the front of the result.
    pub fn append_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<Arc<GroupedEntry>> {
        if lines.is_empty() {
            return Vec::new();
        }
        let grouped = match self.reopen_unterminated() {
            Some(mut pending) => {
                pending.extend(lines.iter().map(|line| line.as_ref().to_string()));
                group(&pending, &mut self.ids)
            }
            None => group(lines, &mut self.ids),
        };
        self.raw_line_count += lines.len();
        self.stats.add_entries(&grouped);

        let added: Vec<Arc<GroupedEntry>> = grouped.into_iter().map(Arc::new).collect();
        self.entries.extend(added.iter().cloned());
        added
    }

    /// Flag the last stored line as still being written. It stays visible
    /// but is not counted until a later append replaces it.
    pub fn mark_last_line_unterminated(&mut self) {
        if !self.entries.is_empty() && !self.unterminated {
            self.unterminated = true;
            self.raw_line_count = self.raw_line_count.saturating_sub(1);
        }
    }

    pub fn has_unterminated_line(&self) -> bool {
        self.unterminated
    }

    /// Remove the last entry and return its complete lines.
    fn reopen_unterminated(&mut self) -> Option<Vec<String>> {
        if !std::mem::take(&mut self.unterminated) {
            return None;
        }
        let entry = self.entries.pop()?;
        self.stats.remove_entry(&entry);

        let mut lines: Vec<String> = entry.lines().map(str::to_string).collect();
        lines.pop();
        tracing::debug!(id = %entry.id, "regrouping entry with unfinished last line");
        Some(lines)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<GroupedEntry>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Arc<GroupedEntry>] {
        &self.entries
    }

    /// Shared copies of `store[range]`, clamped to the stored length.
    pub fn slice(&self, range: Range<usize>) -> Vec<Arc<GroupedEntry>> {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        self.entries[start..end].to_vec()
    }

    /// Index of the entry with `id`. Ids increase strictly in store order,
    /// so this is a binary search.
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |entry| entry.id).ok()
    }

    /// Complete raw lines ingested so far; the tail poller diffs against this.
    pub fn raw_line_count(&self) -> usize {
        self.raw_line_count
    }

    pub fn stats(&self) -> &LogStats {
        &self.stats
    }
}
