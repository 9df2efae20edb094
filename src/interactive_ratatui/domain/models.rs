use crate::source::{FetchError, ResourceId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Viewer,
    Search,
    Help,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FetchKind {
    /// Full load that replaces the window.
    Initial,
    /// Re-fetch used to find lines appended since the last load.
    Tail,
}

// Fetch request and response for the worker thread
#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub generation: u64,
    pub kind: FetchKind,
    pub resource: ResourceId,
}

#[derive(Debug)]
pub struct FetchResponse {
    pub generation: u64,
    pub kind: FetchKind,
    pub result: Result<String, FetchError>,
}
