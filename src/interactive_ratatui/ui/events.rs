use crate::interactive_ratatui::domain::models::FetchKind;
use crate::source::{FetchError, ResourceId};

#[derive(Clone, Debug)]
pub enum Message {
    // Resource selection
    SelectResource(ResourceId),
    NextResource,
    PreviousResource,
    Reload,

    // Fetch results
    FetchCompleted {
        generation: u64,
        kind: FetchKind,
        text: String,
    },
    FetchFailed {
        generation: u64,
        kind: FetchKind,
        error: FetchError,
    },

    // Live tailing
    TailTick,
    ToggleTailing,

    // Scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    LoadOlderReady(u64),

    // Renderer measurements after each frame
    Layout {
        content_height: usize,
        viewport_height: usize,
    },

    // Search
    EnterSearch,
    QueryChanged(String),
    ConfirmSearch,
    CancelSearch,

    // Display options
    ToggleExpand,
    ShowHelp,
    CloseHelp,

    // UI events
    SetStatus(String),
    ClearStatus,
}
