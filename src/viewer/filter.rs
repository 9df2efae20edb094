use crate::grouping::GroupedEntry;
use std::sync::Arc;

/// Case-insensitive substring filter over an entry's main line and sub-lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: String,
    lowered: String,
}

impl SearchFilter {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let lowered = term.to_lowercase();
        Self { term, lowered }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn matches(&self, entry: &GroupedEntry) -> bool {
        if !self.is_active() {
            return true;
        }
        entry
            .lines()
            .any(|line| line.to_lowercase().contains(&self.lowered))
    }

    /// Window positions of the entries that pass the filter.
    pub fn project(&self, window: &[Arc<GroupedEntry>]) -> Vec<usize> {
        if !self.is_active() {
            return (0..window.len()).collect();
        }
        window
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(entry))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_lines;

    fn window() -> Vec<Arc<GroupedEntry>> {
        group_lines(&[
            "2024-01-01 10:00:00.000 [main] INFO app.Main - started",
            "2024-01-01 10:00:01.000 [main] ERROR app.Main - failed",
            "  at app.Db.connect(Db.java:42)",
            "[2023-10-27 10:00:00] Connected",
        ])
        .into_iter()
        .map(Arc::new)
        .collect()
    }

    #[test]
    fn test_empty_term_keeps_everything() {
        let filter = SearchFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.project(&window()), vec![0, 1, 2]);
    }

    #[test]
    fn test_matches_main_line_case_insensitively() {
        let filter = SearchFilter::new("ERROR");
        assert_eq!(filter.project(&window()), vec![1]);

        let filter = SearchFilter::new("connected");
        assert_eq!(filter.project(&window()), vec![2]);
    }

    #[test]
    fn test_matches_sub_lines() {
        let filter = SearchFilter::new("db.java");
        assert_eq!(filter.project(&window()), vec![1]);
    }

    #[test]
    fn test_no_matches() {
        let filter = SearchFilter::new("nothing like this");
        assert!(filter.project(&window()).is_empty());
        assert_eq!(filter.term(), "nothing like this");
    }
}
