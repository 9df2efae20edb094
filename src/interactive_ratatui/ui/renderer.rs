use crate::interactive_ratatui::constants::{HEADER_HEIGHT, STATUS_BAR_HEIGHT};
use crate::interactive_ratatui::ui::app_state::{AppState, Mode};
use crate::interactive_ratatui::ui::components::{
    Component, help_dialog::HelpDialog, is_exit_prompt, log_header::LogHeader, log_view::LogView,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::sync::Arc;

/// Rendered size of the log view, fed back to the scroll preserver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub content_height: usize,
    pub viewport_height: usize,
}

#[derive(Default)]
pub struct Renderer {
    log_header: LogHeader,
    log_view: LogView,
    help_dialog: HelpDialog,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            log_header: LogHeader::new(),
            log_view: LogView::new(),
            help_dialog: HelpDialog::new(),
        }
    }

    fn split(area: Rect) -> [Rect; 3] {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),     // Header
                Constraint::Min(0),                    // Log rows
                Constraint::Length(STATUS_BAR_HEIGHT), // Status
            ])
            .areas(area)
    }

    /// Measure the log view for `area` without drawing, so scroll
    /// corrections land before the frame is painted.
    pub fn measure(&self, area: Rect, state: &AppState) -> LayoutMetrics {
        let chunks = Self::split(area);
        LayoutMetrics {
            content_height: state.content_height(),
            viewport_height: chunks[1].height as usize,
        }
    }

    pub fn render(&mut self, f: &mut Frame, state: &AppState) {
        let chunks = Self::split(f.area());

        let store = state.view.controller.store();
        self.log_header.set_resource(
            state.selected_resource().map(|r| r.display_name()),
            state
                .resources
                .selected
                .map(|index| (index, state.resources.list.len())),
        );
        self.log_header.set_stats(store.stats());
        self.log_header.set_tailing(state.tailing.is_enabled());
        self.log_header.set_search_focused(state.mode == Mode::Search);
        self.log_header.set_query(state.view.filter.term());

        // Hand over only the entries that reach into the viewport
        let projection = &state.view.projection;
        let viewport = chunks[1].height as usize;
        let offset = state
            .view
            .scroll
            .offset()
            .min(projection.total_rows().saturating_sub(viewport));
        let (range, skip_rows) = projection.span(offset, viewport);
        let window = state.view.controller.window();
        let first = state.first_line_number();
        let rows = projection.visible()[range]
            .iter()
            .filter_map(|&index| window.get(index).map(|entry| (first + index, Arc::clone(entry))))
            .collect();
        self.log_view.set_entries(rows, skip_rows);
        self.log_view.set_expanded(state.view.expanded);
        self.log_view.set_loading(state.resources.is_loading);
        self.log_view.set_error(state.resources.error.clone());
        self.log_view.set_filter_term(
            state
                .view
                .filter
                .is_active()
                .then(|| state.view.filter.term().to_string()),
        );

        self.log_header.render(f, chunks[0]);
        self.log_view.render(f, chunks[1]);
        self.render_status(f, chunks[2], state);

        if state.mode == Mode::Help {
            self.help_dialog.render(f, f.area());
        }
    }

    fn render_status(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();

        if let Some(message) = &state.ui.message {
            let style = if is_exit_prompt(&state.ui.message) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            spans.push(Span::styled(message.clone(), style));
            spans.push(Span::raw("  "));
        }

        if state.is_loading_older() {
            spans.push(Span::styled(
                "⟳ loading older entries…  ",
                Style::default().fg(Color::Cyan),
            ));
        } else if state.resources.is_loading {
            spans.push(Span::styled("⟳ loading…  ", Style::default().fg(Color::Cyan)));
        }

        if !state.view.scroll.is_at_bottom() {
            spans.push(Span::styled(
                "↓ more below (End)  ",
                Style::default().fg(Color::Magenta),
            ));
        }

        let window = state.view.controller.window().len();
        let total = state.view.controller.store().len();
        let shown = if state.view.filter.is_active() {
            format!("{} of {window} shown · ", state.view.projection.len())
        } else {
            String::new()
        };
        spans.push(Span::styled(
            format!("{shown}{window}/{total} loaded · ? help"),
            dim,
        ));

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    pub fn get_log_header_mut(&mut self) -> &mut LogHeader {
        &mut self.log_header
    }

    pub fn get_log_view_mut(&mut self) -> &mut LogView {
        &mut self.log_view
    }

    pub fn get_help_dialog_mut(&mut self) -> &mut HelpDialog {
        &mut self.help_dialog
    }
}
