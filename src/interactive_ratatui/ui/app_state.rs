use crate::ViewerOptions;
use crate::interactive_ratatui::constants::*;
use crate::interactive_ratatui::domain::models::{FetchKind, FetchRequest};
use crate::interactive_ratatui::ui::commands::Command;
use crate::interactive_ratatui::ui::events::Message;
use crate::source::{FetchError, ResourceId};
use crate::viewer::{
    LoadOlder, Projection, ScrollPositionPreserver, SearchFilter, TailUpdate, TailingPoller,
    WindowController,
};
use std::time::Instant;

// Re-export Mode
pub use crate::interactive_ratatui::domain::models::Mode;

pub struct AppState {
    pub mode: Mode,
    pub resources: ResourceState,
    pub view: ViewState,
    pub tailing: TailingPoller,
    pub ui: UiState,
}

pub struct ResourceState {
    pub list: Vec<ResourceId>,
    pub selected: Option<usize>,
    /// Bumped on every resource switch or reload; responses carrying an
    /// older generation are discarded.
    pub generation: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct ViewState {
    pub controller: WindowController,
    pub scroll: ScrollPositionPreserver,
    pub filter: SearchFilter,
    /// Window entries that pass `filter`, with their row offsets.
    pub projection: Projection,
    pub expanded: bool,
    /// Tail lines received while a scroll correction was pending.
    pub deferred_tail: Vec<String>,
}

pub struct UiState {
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&ViewerOptions::default(), Vec::new())
    }
}

impl AppState {
    pub fn new(options: &ViewerOptions, resources: Vec<ResourceId>) -> Self {
        let mut tailing = TailingPoller::new(options.poll_interval);
        tailing.set_enabled(options.follow);

        Self {
            mode: Mode::Viewer,
            resources: ResourceState {
                list: resources,
                selected: None,
                generation: 0,
                is_loading: false,
                error: None,
            },
            view: ViewState {
                controller: WindowController::new(options.chunk_size),
                scroll: ScrollPositionPreserver::new(),
                filter: SearchFilter::new(options.initial_query.clone().unwrap_or_default()),
                projection: Projection::new(),
                expanded: options.expand,
                deferred_tail: Vec::new(),
            },
            tailing,
            ui: UiState { message: None },
        }
    }

    pub fn selected_resource(&self) -> Option<&ResourceId> {
        self.resources
            .selected
            .and_then(|index| self.resources.list.get(index))
    }

    /// First line number of the window, counted from 1 over the whole log.
    pub fn first_line_number(&self) -> usize {
        self.view
            .controller
            .range()
            .map(|range| range.start + 1)
            .unwrap_or(1)
    }

    /// Rows the log view needs for the entries that pass the filter.
    pub fn content_height(&self) -> usize {
        if self.resources.error.is_some() {
            return 0;
        }
        self.view.projection.total_rows()
    }

    pub fn update(&mut self, msg: Message) -> Command {
        match msg {
            Message::SelectResource(resource) => {
                let index = match self.resources.list.iter().position(|r| *r == resource) {
                    Some(index) => index,
                    None => {
                        self.resources.list.push(resource);
                        self.resources.list.len() - 1
                    }
                };
                self.select_index(index)
            }
            Message::NextResource => self.cycle_resource(1),
            Message::PreviousResource => self.cycle_resource(-1),
            Message::Reload => {
                if self.resources.is_loading {
                    return Command::None;
                }
                match self.selected_resource().cloned() {
                    Some(resource) => self.begin_fetch_initial(resource),
                    None => Command::None,
                }
            }
            Message::FetchCompleted {
                generation,
                kind,
                text,
            } => {
                if generation != self.resources.generation {
                    tracing::debug!(
                        generation,
                        current = self.resources.generation,
                        ?kind,
                        "discarding stale fetch"
                    );
                    return Command::None;
                }
                match kind {
                    FetchKind::Initial => self.apply_initial(&text),
                    FetchKind::Tail => self.apply_tail_fetch(&text),
                }
            }
            Message::FetchFailed {
                generation,
                kind,
                error,
            } => {
                if generation != self.resources.generation {
                    return Command::None;
                }
                match kind {
                    FetchKind::Initial => self.fail_initial(error),
                    FetchKind::Tail => {
                        self.tailing.on_failed(&error);
                        Command::None
                    }
                }
            }
            Message::TailTick => self.tail_tick(),
            Message::ToggleTailing => {
                let enabled = !self.tailing.is_enabled();
                self.tailing.set_enabled(enabled);
                let status = if enabled {
                    "Live tailing on"
                } else {
                    "Live tailing paused"
                };
                self.set_status(status)
            }
            Message::ScrollUp(rows) => {
                self.view.scroll.scroll_by(-(rows as isize));
                self.maybe_load_older()
            }
            Message::ScrollDown(rows) => {
                self.view.scroll.scroll_by(rows as isize);
                Command::None
            }
            Message::PageUp => {
                let page = self.page_size();
                self.view.scroll.scroll_by(-(page as isize));
                self.maybe_load_older()
            }
            Message::PageDown => {
                let page = self.page_size();
                self.view.scroll.scroll_by(page as isize);
                Command::None
            }
            Message::ScrollToTop => {
                self.view.scroll.scroll_to_top();
                self.maybe_load_older()
            }
            Message::ScrollToBottom => {
                self.view.scroll.scroll_to_bottom();
                Command::None
            }
            Message::LoadOlderReady(generation) => self.load_older_ready(generation),
            Message::Layout {
                content_height,
                viewport_height,
            } => {
                let restored = self.view.scroll.on_layout(content_height, viewport_height);
                if restored {
                    self.view.controller.finish_load_older();
                    if !self.view.deferred_tail.is_empty() {
                        let lines = std::mem::take(&mut self.view.deferred_tail);
                        self.apply_tail_lines(lines);
                    }
                }
                Command::None
            }
            Message::EnterSearch => {
                self.mode = Mode::Search;
                Command::None
            }
            Message::QueryChanged(query) => {
                self.view.filter = SearchFilter::new(query);
                self.refresh_view();
                Command::None
            }
            Message::ConfirmSearch => {
                self.mode = Mode::Viewer;
                Command::None
            }
            Message::CancelSearch => {
                self.mode = Mode::Viewer;
                if self.view.filter.is_active() {
                    self.view.filter = SearchFilter::default();
                    self.refresh_view();
                }
                Command::None
            }
            Message::ToggleExpand => {
                // Row heights feed the pending anchor restore
                if self.view.scroll.has_pending_restore() {
                    return Command::None;
                }
                self.view.expanded = !self.view.expanded;
                self.refresh_view();
                if self.view.scroll.is_at_bottom() {
                    self.view.scroll.request_bottom();
                }
                Command::None
            }
            Message::ShowHelp => {
                self.mode = Mode::Help;
                Command::None
            }
            Message::CloseHelp => {
                self.mode = Mode::Viewer;
                Command::None
            }
            Message::SetStatus(status) => self.set_status(&status),
            Message::ClearStatus => {
                self.ui.message = None;
                Command::None
            }
        }
    }

    fn set_status(&mut self, status: &str) -> Command {
        self.ui.message = Some(status.to_string());
        Command::ScheduleClearMessage(MESSAGE_CLEAR_DELAY_MS)
    }

    fn page_size(&self) -> usize {
        self.view.scroll.viewport_height().saturating_sub(1).max(1)
    }

    fn cycle_resource(&mut self, step: isize) -> Command {
        let len = self.resources.list.len();
        if len < 2 {
            return Command::None;
        }
        let current = self.resources.selected.unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len as isize) as usize;
        self.select_index(next)
    }

    fn select_index(&mut self, index: usize) -> Command {
        let Some(resource) = self.resources.list.get(index).cloned() else {
            return Command::None;
        };
        self.resources.selected = Some(index);
        self.resources.error = None;
        self.reset_view();
        self.begin_fetch_initial(resource)
    }

    fn reset_view(&mut self) {
        self.view.controller.clear();
        self.view.scroll.reset();
        self.view.projection.clear();
        self.view.deferred_tail.clear();
    }

    fn begin_fetch_initial(&mut self, resource: ResourceId) -> Command {
        self.resources.generation += 1;
        self.resources.is_loading = true;
        self.tailing.reset();
        tracing::info!(resource = %resource, generation = self.resources.generation, "loading log");
        Command::Fetch(FetchRequest {
            generation: self.resources.generation,
            kind: FetchKind::Initial,
            resource,
        })
    }

    fn apply_initial(&mut self, text: &str) -> Command {
        self.resources.is_loading = false;
        self.resources.error = None;
        self.view.controller.load_initial(text);
        self.view.deferred_tail.clear();
        self.view.scroll.reset();
        self.view.scroll.request_bottom();
        self.refresh_view();
        tracing::info!(
            entries = self.view.controller.store().len(),
            window = self.view.controller.window().len(),
            "log loaded"
        );
        Command::None
    }

    fn fail_initial(&mut self, error: FetchError) -> Command {
        tracing::error!(error = %error, "failed to load log");
        self.resources.is_loading = false;
        self.resources.error = Some(error.to_string());
        self.view.controller.clear();
        self.view.scroll.reset();
        self.view.deferred_tail.clear();
        self.refresh_view();
        Command::None
    }

    fn tail_tick(&mut self) -> Command {
        if self.resources.is_loading || self.resources.error.is_some() {
            return Command::None;
        }
        let Some(resource) = self.selected_resource().cloned() else {
            return Command::None;
        };
        let now = Instant::now();
        if !self.tailing.is_due(now) {
            return Command::None;
        }
        self.tailing.mark_dispatched(now);
        Command::Fetch(FetchRequest {
            generation: self.resources.generation,
            kind: FetchKind::Tail,
            resource,
        })
    }

    fn apply_tail_fetch(&mut self, text: &str) -> Command {
        let known = self.view.controller.store().raw_line_count() + self.view.deferred_tail.len();
        match self.tailing.on_fetched(text, known) {
            TailUpdate::NewLines(lines) => {
                if self.view.scroll.has_pending_restore() {
                    self.view.deferred_tail.extend(lines);
                } else {
                    self.apply_tail_lines(lines);
                }
            }
            TailUpdate::Unchanged | TailUpdate::Shrunk { .. } => {}
        }
        Command::None
    }

    fn apply_tail_lines(&mut self, lines: Vec<String>) {
        let was_at_bottom = self.view.scroll.is_at_bottom();
        let replaces_last = self.view.controller.store().has_unterminated_line();
        let known = self.view.controller.window().len();
        let added = self.view.controller.append_tail(&lines);
        if replaces_last {
            self.refresh_view();
        } else {
            let view = &mut self.view;
            view.projection.extend_from(
                view.controller.window(),
                known,
                &view.filter,
                view.expanded,
            );
        }
        tracing::debug!(lines = lines.len(), entries = added, "tail appended");
        if was_at_bottom && added > 0 {
            self.view.scroll.request_bottom();
        }
    }

    fn maybe_load_older(&mut self) -> Command {
        let scroll = &self.view.scroll;
        if !scroll.is_attached()
            || !scroll.is_at_top()
            || scroll.has_pending_restore()
            || scroll.has_bottom_request()
        {
            return Command::None;
        }
        if self.view.controller.begin_load_older() {
            Command::ScheduleLoadOlder {
                generation: self.resources.generation,
                delay_ms: LOAD_OLDER_DELAY_MS,
            }
        } else {
            Command::None
        }
    }

    fn load_older_ready(&mut self, generation: u64) -> Command {
        if generation != self.resources.generation || !self.view.controller.is_loading_older() {
            return Command::None;
        }
        self.view.scroll.capture();
        match self.view.controller.apply_load_older() {
            LoadOlder::Prepended { count } => {
                tracing::debug!(count, "prepended older entries");
                let view = &mut self.view;
                view.projection.prepend(
                    view.controller.window(),
                    count,
                    &view.filter,
                    view.expanded,
                );
            }
            outcome => {
                tracing::debug!(?outcome, "nothing older to prepend");
                self.view.scroll.cancel_restore();
            }
        }
        Command::None
    }

    /// Re-project the whole window, for filter or expansion changes and
    /// full loads.
    pub fn refresh_view(&mut self) {
        let view = &mut self.view;
        view.projection
            .rebuild(view.controller.window(), &view.filter, view.expanded);
    }

    pub fn is_loading_older(&self) -> bool {
        self.view.controller.is_loading_older()
    }
}
