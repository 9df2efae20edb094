use super::filter::SearchFilter;
use crate::grouping::GroupedEntry;
use std::ops::Range;
use std::sync::Arc;

/// Rows an entry occupies: its main line plus either a collapsed summary
/// row or every sub-line.
pub fn entry_rows(entry: &GroupedEntry, expanded: bool) -> usize {
    match (entry.sub_lines.len(), expanded) {
        (0, _) => 1,
        (n, true) => 1 + n,
        (_, false) => 2,
    }
}

/// Window entries that pass the filter, each with the row it starts at.
///
/// Kept up to date incrementally as the window grows at either end, so a
/// frame only has to look up the rows it draws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Window positions, ascending.
    visible: Vec<usize>,
    /// `row_starts[i]` is the first row of `visible[i]`.
    row_starts: Vec<usize>,
    total_rows: usize,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.visible.clear();
        self.row_starts.clear();
        self.total_rows = 0;
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    fn push(&mut self, index: usize, entry: &GroupedEntry, expanded: bool) {
        self.visible.push(index);
        self.row_starts.push(self.total_rows);
        self.total_rows += entry_rows(entry, expanded);
    }

    pub fn rebuild(
        &mut self,
        window: &[Arc<GroupedEntry>],
        filter: &SearchFilter,
        expanded: bool,
    ) {
        self.clear();
        self.extend_from(window, 0, filter, expanded);
    }

    /// Project window positions `from..` after what is already projected.
    pub fn extend_from(
        &mut self,
        window: &[Arc<GroupedEntry>],
        from: usize,
        filter: &SearchFilter,
        expanded: bool,
    ) {
        for (index, entry) in window.iter().enumerate().skip(from) {
            if filter.matches(entry) {
                self.push(index, entry, expanded);
            }
        }
    }

    /// Account for `count` entries inserted at the front of the window.
    /// Existing positions and rows shift; only the new entries are filtered.
    pub fn prepend(
        &mut self,
        window: &[Arc<GroupedEntry>],
        count: usize,
        filter: &SearchFilter,
        expanded: bool,
    ) {
        let mut head = Projection::new();
        for (index, entry) in window.iter().enumerate().take(count) {
            if filter.matches(entry) {
                head.push(index, entry, expanded);
            }
        }
        let shift = head.total_rows;
        head.visible.extend(self.visible.iter().map(|&index| index + count));
        head.row_starts
            .extend(self.row_starts.iter().map(|&start| start + shift));
        head.total_rows += self.total_rows;
        *self = head;
    }

    /// Positions in [`visible`](Self::visible) covering rows
    /// `offset..offset + height`, and how many rows of the first of them lie
    /// above `offset`.
    pub fn span(&self, offset: usize, height: usize) -> (Range<usize>, usize) {
        if offset >= self.total_rows || height == 0 {
            return (0..0, 0);
        }
        // row_starts[0] is 0, so at least one start is <= offset
        let start = self.row_starts.partition_point(|&row| row <= offset) - 1;
        let end = self
            .row_starts
            .partition_point(|&row| row < offset + height);
        (start..end, offset - self.row_starts[start])
    }
}
