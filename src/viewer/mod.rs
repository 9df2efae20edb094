//! Windowed view over a growing log: the authoritative entry sequence, the
//! rendered window, scroll anchoring and live-tail diffing.

pub mod filter;
pub mod projection;
pub mod scroll;
pub mod sequence_store;
pub mod tail_poller;
pub mod window;


pub use filter::SearchFilter;
pub use projection::{Projection, entry_rows};
pub use scroll::{ScrollAnchor, ScrollPositionPreserver};
pub use sequence_store::SequenceStore;
pub use tail_poller::{TailUpdate, TailingPoller, diff_tail};
pub use window::{DEFAULT_CHUNK_SIZE, LoadOlder, WindowController};
