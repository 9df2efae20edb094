use crate::source::{FetchError, count_complete_lines, split_lines};
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// What a re-fetched text means for the known line count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailUpdate {
    NewLines(Vec<String>),
    Unchanged,
    /// The resource got shorter. Rotation and truncation are not followed.
    Shrunk { known: usize, current: usize },
}

/// Diff `text` against the number of complete raw lines already ingested.
///
/// A final line without its `\n` is held back until a later fetch shows it
/// finished, so a line caught mid-write is never ingested twice or cut short.
pub fn diff_tail(text: &str, known_line_count: usize) -> TailUpdate {
    let current = count_complete_lines(text);
    if current > known_line_count {
        let new_lines = split_lines(text)
            .into_iter()
            .skip(known_line_count)
            .take(current - known_line_count)
            .map(str::to_string)
            .collect();
        TailUpdate::NewLines(new_lines)
    } else if current == known_line_count {
        TailUpdate::Unchanged
    } else {
        TailUpdate::Shrunk {
            known: known_line_count,
            current,
        }
    }
}

/// Interval gate for live tailing. At most one tail fetch is in flight.
#[derive(Debug, Clone)]
pub struct TailingPoller {
    enabled: bool,
    interval: Duration,
    last_tick: Option<Instant>,
    in_flight: bool,
}

impl Default for TailingPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl TailingPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            enabled: false,
            interval,
            last_tick: None,
            in_flight: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.in_flight = false;
        }
        self.last_tick = None;
    }

    /// Forget any in-flight fetch; its result will be discarded by the caller.
    pub fn reset(&mut self) {
        self.in_flight = false;
        self.last_tick = None;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if !self.enabled || self.in_flight {
            return false;
        }
        match self.last_tick {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        }
    }

    pub fn mark_dispatched(&mut self, now: Instant) {
        self.last_tick = Some(now);
        self.in_flight = true;
    }

    pub fn on_fetched(&mut self, text: &str, known_line_count: usize) -> TailUpdate {
        self.in_flight = false;
        let update = diff_tail(text, known_line_count);
        if let TailUpdate::Shrunk { known, current } = &update {
            tracing::warn!(known, current, "log file shrank while tailing; ignoring");
        }
        update
    }

    pub fn on_failed(&mut self, error: &FetchError) {
        self.in_flight = false;
        tracing::warn!(error = %error, "tail fetch failed");
    }
}
