//! Retrieval of a log resource's full text.
//!
//! The viewer never reads files directly; it asks a [`LogSource`] for the
//! complete current text of a resource and relies on the append-only
//! assumption (each fetch has the previous fetch as a prefix) to find the
//! newly written lines.

mod error;
mod file_source;

pub use error::FetchError;
pub use file_source::{FileSource, expand_tilde};

use std::fmt;
use std::path::{Path, PathBuf};

/// Names the resource currently selected for viewing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(PathBuf);

impl ResourceId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name for headers, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

pub trait LogSource: Send + Sync {
    fn fetch_text(&self, resource: &ResourceId) -> Result<String, FetchError>;
}

/// Split fetched text into raw lines. `\r\n` endings are accepted and a
/// trailing newline does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Lines already ended by `\n`. A final line still being written is not
/// counted.
pub fn count_complete_lines(text: &str) -> usize {
    memchr::memchr_iter(b'\n', text.as_bytes()).count()
}

/// Whether the last line of `text` has not been terminated yet.
pub fn has_unterminated_line(text: &str) -> bool {
    !text.is_empty() && !text.ends_with('\n')
}
