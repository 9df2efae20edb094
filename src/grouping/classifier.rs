use super::entry::StructuredFields;
use regex::Regex;
use std::sync::OnceLock;

// timestamp [thread] LEVEL logger - message
const STRUCTURED_PATTERN: &str = r"^([0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3})\s+\[(.*?)\]\s+([A-Z]+)\s+([a-zA-Z0-9._-]+)\s+-\s+(.*)";

// [2023-10-27 10:00:00.123] | 2023-10-27T10:00:00.123Z | Oct 27 10:00:00
const TIMESTAMP_PATTERN: &str = concat!(
    r"^\s*(?:",
    r"\[[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{3})?\]",
    r"|[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]{3})?Z",
    r"|[A-Za-z0-9_]{3} [0-9]{1,2} [0-9]{2}:[0-9]{2}:[0-9]{2}",
    r")"
);

static STRUCTURED_REGEX: OnceLock<Regex> = OnceLock::new();
static TIMESTAMP_REGEX: OnceLock<Regex> = OnceLock::new();

fn structured_regex() -> &'static Regex {
    STRUCTURED_REGEX
        .get_or_init(|| Regex::new(STRUCTURED_PATTERN).expect("structured line pattern is valid"))
}

fn timestamp_regex() -> &'static Regex {
    TIMESTAMP_REGEX
        .get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid"))
}

/// How a single raw line relates to the entry stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Starts an entry and carries the five structured fields.
    StructuredStart(StructuredFields),
    /// Starts an entry recognised only by its leading timestamp.
    GenericStart,
    /// Belongs to the preceding entry.
    Continuation,
}

impl LineClass {
    pub fn starts_entry(&self) -> bool {
        !matches!(self, LineClass::Continuation)
    }
}

pub fn classify(line: &str) -> LineClass {
    if let Some(caps) = structured_regex().captures(line) {
        return LineClass::StructuredStart(StructuredFields {
            timestamp: caps[1].to_string(),
            thread: caps[2].to_string(),
            level: caps[3].to_string(),
            logger: caps[4].to_string(),
            message: caps[5].trim().to_string(),
        });
    }

    if timestamp_regex().is_match(line) {
        LineClass::GenericStart
    } else {
        LineClass::Continuation
    }
}
