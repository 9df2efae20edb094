use crate::interactive_ratatui::ui::components::{Component, text_input::TextInput};
use crate::interactive_ratatui::ui::events::Message;
use crate::stats::LogStats;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// File name, running statistics, tailing state and the search input.
#[derive(Default)]
pub struct LogHeader {
    resource: Option<String>,
    resource_position: Option<(usize, usize)>,
    total: usize,
    errors: usize,
    warnings: usize,
    tailing: bool,
    search_focused: bool,
    input: TextInput,
}

impl LogHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_resource(&mut self, name: Option<String>, position: Option<(usize, usize)>) {
        self.resource = name;
        self.resource_position = position;
    }

    pub fn set_stats(&mut self, stats: &LogStats) {
        self.total = stats.total;
        self.errors = stats.errors;
        self.warnings = stats.warnings;
    }

    pub fn set_tailing(&mut self, tailing: bool) {
        self.tailing = tailing;
    }

    pub fn set_search_focused(&mut self, focused: bool) {
        self.search_focused = focused;
    }

    pub fn set_query(&mut self, query: &str) {
        if self.input.text() != query {
            self.input.set_text(query);
        }
    }

    pub fn query(&self) -> &str {
        self.input.text()
    }

    fn title(&self) -> String {
        let name = self.resource.as_deref().unwrap_or("no file");
        match self.resource_position {
            Some((index, count)) if count > 1 => format!(" {name} ({}/{count}) ", index + 1),
            _ => format!(" {name} "),
        }
    }

    fn stats_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![Span::styled(
            format!("{} entries", self.total),
            Style::default().fg(Color::White),
        )];
        if self.errors > 0 {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("✖ {} errors", self.errors),
                Style::default().fg(Color::Red),
            ));
        }
        if self.warnings > 0 {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("⚠ {} warnings", self.warnings),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::raw("  "));
        if self.tailing {
            spans.push(Span::styled(
                "● LIVE",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled("○ paused", Style::default().fg(Color::DarkGray)));
        }
        spans
    }
}

impl Component for LogHeader {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let mut spans = self.stats_spans();

        if self.search_focused {
            spans.push(Span::raw("   "));
            spans.push(Span::styled("/ ", Style::default().fg(Color::Yellow)));
            spans.extend(self.input.render_cursor_spans());
        } else if !self.input.is_empty() {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("filter: {}", self.input.text()),
                Style::default().fg(Color::Yellow),
            ));
        }

        let border_style = if self.search_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(self.title())
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        f.render_widget(header, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                Some(Message::CancelSearch)
            }
            KeyCode::Enter => Some(Message::ConfirmSearch),
            _ => {
                if self.input.handle_key(key) {
                    Some(Message::QueryChanged(self.input.text().to_string()))
                } else {
                    None
                }
            }
        }
    }
}
