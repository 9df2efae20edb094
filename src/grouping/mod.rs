pub mod classifier;
pub mod entry;
pub mod grouper;


pub use classifier::{LineClass, classify};
pub use entry::{EntryId, GroupedEntry, IdCounter, StructuredFields};
pub use grouper::{group, group_lines};
