use crate::interactive_ratatui::domain::models::{FetchRequest, FetchResponse};
use crate::source::LogSource;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

pub struct FetchService {
    source: Arc<dyn LogSource>,
}

impl FetchService {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }

    pub fn fetch(&self, request: &FetchRequest) -> FetchResponse {
        let result = self.source.fetch_text(&request.resource);
        match &result {
            Ok(text) => tracing::debug!(
                resource = %request.resource,
                generation = request.generation,
                kind = ?request.kind,
                bytes = text.len(),
                "fetched log text"
            ),
            Err(e) => tracing::debug!(
                resource = %request.resource,
                generation = request.generation,
                kind = ?request.kind,
                error = %e,
                "fetch failed"
            ),
        }

        FetchResponse {
            generation: request.generation,
            kind: request.kind,
            result,
        }
    }

    /// Serve requests on a background thread until the request side is dropped.
    pub fn start_worker(self: Arc<Self>) -> (Sender<FetchRequest>, Receiver<FetchResponse>) {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (response_tx, response_rx) = mpsc::channel::<FetchResponse>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                if response_tx.send(self.fetch(&request)).is_err() {
                    break;
                }
            }
            tracing::debug!("fetch worker stopped");
        });

        (request_tx, response_rx)
    }
}
