pub mod formatters;
pub mod grouping;
pub mod interactive_ratatui;
pub mod profiling;
pub mod source;
pub mod stats;
pub mod viewer;

use std::time::Duration;

/// Options shared by print mode and interactive mode
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Entries per window chunk (initial load and each backward load)
    pub chunk_size: usize,
    pub poll_interval: Duration,
    /// Start with live tailing enabled
    pub follow: bool,
    /// Show continuation lines instead of a summary row
    pub expand: bool,
    pub initial_query: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            chunk_size: viewer::DEFAULT_CHUNK_SIZE,
            poll_interval: viewer::tail_poller::DEFAULT_POLL_INTERVAL,
            follow: false,
            expand: false,
            initial_query: None,
        }
    }
}

pub use grouping::{GroupedEntry, LineClass, StructuredFields, classify, group_lines};
pub use source::{FetchError, FileSource, LogSource, ResourceId, expand_tilde};
pub use stats::{LogStats, format_statistics};
pub use viewer::{TailUpdate, TailingPoller, WindowController};
