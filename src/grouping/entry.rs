use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Identifier of a grouped entry, rendered as `log-<n>`.
///
/// Ids are minted by an [`IdCounter`] and strictly increase in the order
/// entries are produced, which lets the sequence store locate an entry by
/// binary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log-{}", self.0)
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Monotonic id source threaded through grouping calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Fields captured from a line in the `timestamp [thread] LEVEL logger - message` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredFields {
    pub timestamp: String,
    pub thread: String,
    pub level: String,
    pub logger: String,
    pub message: String,
}

/// One logical log entry: the line that started it plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedEntry {
    pub id: EntryId,
    pub main_line: String,
    pub sub_lines: Vec<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub fields: Option<StructuredFields>,
}

impl GroupedEntry {
    pub fn new(id: EntryId, main_line: impl Into<String>, fields: Option<StructuredFields>) -> Self {
        Self {
            id,
            main_line: main_line.into(),
            sub_lines: Vec::new(),
            fields,
        }
    }

    pub fn level(&self) -> Option<&str> {
        self.fields.as_ref().map(|f| f.level.as_str())
    }

    pub fn is_structured(&self) -> bool {
        self.fields.is_some()
    }

    /// Byte range of the level token in `main_line`.
    ///
    /// The token is located after the `]` closing the thread, so a level
    /// word inside the thread name or the timestamp is never picked.
    pub fn level_span(&self) -> Option<Range<usize>> {
        let fields = self.fields.as_ref()?;
        let line = self.main_line.as_str();
        let after_timestamp = fields.timestamp.len();
        let open = after_timestamp + line.get(after_timestamp..)?.find('[')?;
        let close = open + 1 + fields.thread.len();
        if line.get(close..close + 1)? != "]" {
            return None;
        }
        let rest = line.get(close + 1..)?;
        let start = close + 1 + (rest.len() - rest.trim_start().len());
        let end = start + fields.level.len();
        (line.get(start..end)? == fields.level).then_some(start..end)
    }

    /// Number of physical lines this entry was built from.
    pub fn line_count(&self) -> usize {
        1 + self.sub_lines.len()
    }

    /// Main line followed by the sub-lines, in file order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.main_line.as_str()).chain(self.sub_lines.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_counter_is_monotonic() {
        let mut counter = IdCounter::new();
        assert_eq!(counter.next_id(), EntryId::new(0));
        assert_eq!(counter.next_id(), EntryId::new(1));
        assert_eq!(counter.peek(), 2);

        counter.reset();
        assert_eq!(counter.next_id(), EntryId::new(0));
    }

    #[test]
    fn test_entry_id_display() {
        assert_eq!(EntryId::new(42).to_string(), "log-42");
    }

    #[test]
    fn test_serialize_unstructured_entry_omits_fields() {
        let mut entry = GroupedEntry::new(EntryId::new(3), "plain line", None);
        entry.sub_lines.push("  more".to_string());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "log-3");
        assert_eq!(json["mainLine"], "plain line");
        assert_eq!(json["subLines"][0], "  more");
        assert!(json.get("level").is_none());
    }

    #[test]
    fn test_serialize_structured_entry_flattens_fields() {
        let entry = GroupedEntry::new(
            EntryId::new(0),
            "2024-01-01 10:00:00.000 [main] INFO app.Main - started",
            Some(StructuredFields {
                timestamp: "2024-01-01 10:00:00.000".to_string(),
                thread: "main".to_string(),
                level: "INFO".to_string(),
                logger: "app.Main".to_string(),
                message: "started".to_string(),
            }),
        );

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["logger"], "app.Main");
        assert_eq!(json["message"], "started");
    }

    #[test]
    fn test_level_span_skips_thread_name() {
        let line = "2024-01-01 10:00:00.000 [worker INFO 1] WARN app.Pool - slow";
        let entry = GroupedEntry::new(
            EntryId::new(0),
            line,
            Some(StructuredFields {
                timestamp: "2024-01-01 10:00:00.000".to_string(),
                thread: "worker INFO 1".to_string(),
                level: "WARN".to_string(),
                logger: "app.Pool".to_string(),
                message: "slow".to_string(),
            }),
        );

        let span = entry.level_span().unwrap();
        assert_eq!(&line[span.clone()], "WARN");
        assert_eq!(span.start, line.find("] WARN").unwrap() + 2);

        let plain = GroupedEntry::new(EntryId::new(1), "[2023-10-27 10:00:00] INFO x", None);
        assert!(plain.level_span().is_none());
    }

    #[test]
    fn test_lines_iterates_in_file_order() {
        let mut entry = GroupedEntry::new(EntryId::new(0), "head", None);
        entry.sub_lines = vec!["a".to_string(), "b".to_string()];

        assert_eq!(entry.lines().collect::<Vec<_>>(), vec!["head", "a", "b"]);
        assert_eq!(entry.line_count(), 3);
    }
}
