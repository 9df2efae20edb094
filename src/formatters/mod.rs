pub mod entry_formatter;

pub use entry_formatter::{entry_to_json, format_entry, level_colored};
