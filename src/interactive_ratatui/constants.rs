//! Constants for the interactive viewer
//!
//! Timing and layout values shared by the run loop, state and components.

// Timing constants
/// Message auto-clear delay in milliseconds
pub const MESSAGE_CLEAR_DELAY_MS: u64 = 3000;

/// Event polling interval in milliseconds
pub const EVENT_POLL_INTERVAL_MS: u64 = 50;

/// Double Ctrl+C timeout in seconds
pub const DOUBLE_CTRL_C_TIMEOUT_SECS: u64 = 1;

/// Delay between reaching the top and prepending the previous chunk.
/// Gives the "loading older" indicator a frame to show up.
pub const LOAD_OLDER_DELAY_MS: u64 = 150;

// UI Layout constants
/// Height of the header (file, stats, search)
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status line under the log view
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Rows scrolled per mouse wheel notch
pub const MOUSE_SCROLL_ROWS: usize = 3;

// Log view constants
/// Width of the entry number column
pub const LINE_NUMBER_WIDTH: usize = 7;

/// Indentation of sub-lines under their main line
pub const SUB_LINE_INDENT: &str = "    ";

// Help dialog dimensions
/// Maximum width for help dialog
pub const HELP_DIALOG_MAX_WIDTH: u16 = 72;

/// Minimum margin around help dialog
pub const HELP_DIALOG_MARGIN: u16 = 4;

pub const EXIT_PROMPT: &str = "Press Ctrl+C again to exit";
