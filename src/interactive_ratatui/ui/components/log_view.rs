use crate::grouping::GroupedEntry;
use crate::interactive_ratatui::constants::{LINE_NUMBER_WIDTH, SUB_LINE_INDENT};
use crate::interactive_ratatui::ui::components::Component;
use crate::interactive_ratatui::ui::events::Message;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::sync::Arc;

pub fn level_style(level: Option<&str>) -> Style {
    match level {
        Some("FATAL") => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Some("ERROR") => Style::default().fg(Color::Red),
        Some("WARN") | Some("WARNING") => Style::default().fg(Color::Yellow),
        Some("INFO") => Style::default().fg(Color::Blue),
        Some("DEBUG") | Some("TRACE") => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    }
}

/// Log rows for the viewport. The renderer hands over only the entries
/// that intersect it, each with its line number in the whole log.
#[derive(Default)]
pub struct LogView {
    entries: Vec<(usize, Arc<GroupedEntry>)>,
    /// Rows of the first entry scrolled above the viewport
    skip_rows: usize,
    expanded: bool,
    is_loading: bool,
    error: Option<String>,
    filter_term: Option<String>,
}

impl LogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entries(&mut self, entries: Vec<(usize, Arc<GroupedEntry>)>, skip_rows: usize) {
        self.entries = entries;
        self.skip_rows = skip_rows;
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_filter_term(&mut self, term: Option<String>) {
        self.filter_term = term;
    }

    fn gutter(number: Option<usize>) -> Span<'static> {
        let text = match number {
            Some(n) => format!("{n:>width$} │ ", width = LINE_NUMBER_WIDTH),
            None => format!("{:>width$} │ ", "", width = LINE_NUMBER_WIDTH),
        };
        Span::styled(text, Style::default().fg(Color::DarkGray))
    }

    fn main_row(entry: &GroupedEntry, number: usize) -> Line<'_> {
        let mut spans = vec![Self::gutter(Some(number))];
        let level = entry.level();
        let style = level_style(level);

        // Highlight only the level token of structured lines
        let token_at = entry.level_span().map(|span| (span.start, span.end));
        match token_at {
            Some((start, end)) => {
                spans.push(Span::styled(
                    &entry.main_line[..start],
                    Style::default().fg(Color::DarkGray),
                ));
                spans.push(Span::styled(
                    &entry.main_line[start..end],
                    style.add_modifier(Modifier::BOLD),
                ));
                let rest_style = match level {
                    Some("ERROR") | Some("FATAL") => style,
                    _ => Style::default(),
                };
                spans.push(Span::styled(&entry.main_line[end..], rest_style));
            }
            None => spans.push(Span::styled(entry.main_line.as_str(), style)),
        }
        Line::from(spans)
    }

    fn entry_lines<'a>(&'a self, entry: &'a GroupedEntry, number: usize) -> Vec<Line<'a>> {
        let mut lines = vec![Self::main_row(entry, number)];
        if entry.sub_lines.is_empty() {
            return lines;
        }
        if self.expanded {
            lines.extend(entry.sub_lines.iter().map(|sub| {
                Line::from(vec![
                    Self::gutter(None),
                    Span::raw(SUB_LINE_INDENT),
                    Span::styled(sub.as_str(), Style::default().fg(Color::Gray)),
                ])
            }));
        } else {
            let count = entry.sub_lines.len();
            let noun = if count == 1 { "line" } else { "lines" };
            lines.push(Line::from(vec![
                Self::gutter(None),
                Span::raw(SUB_LINE_INDENT),
                Span::styled(
                    format!("▸ {count} more {noun}"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }
        lines
    }

    fn visible_rows(&self, height: usize) -> Vec<Line<'_>> {
        self.entries
            .iter()
            .flat_map(|(number, entry)| self.entry_lines(entry, *number))
            .skip(self.skip_rows)
            .take(height)
            .collect()
    }

    fn render_notice(&self, f: &mut Frame, area: Rect, text: String, style: Style, title: &str) {
        let notice = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(style),
            )
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(notice, area);
    }
}

impl Component for LogView {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let viewport_height = area.height as usize;

        if let Some(error) = &self.error {
            let text = format!("{error}\n\nPress r to retry");
            self.render_notice(f, area, text, Style::default().fg(Color::Red), " Error Loading File ");
            return;
        }

        if self.entries.is_empty() {
            let text = if self.is_loading {
                "Loading…".to_string()
            } else if let Some(term) = &self.filter_term {
                format!("No entries match \"{term}\"")
            } else {
                "No log entries".to_string()
            };
            self.render_notice(f, area, text, Style::default().fg(Color::DarkGray), "");
            return;
        }

        let rows = self.visible_rows(viewport_height);
        f.render_widget(Paragraph::new(rows), area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Message::ScrollUp(1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::ScrollDown(1)),
            KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::ScrollToTop),
            KeyCode::End | KeyCode::Char('G') => Some(Message::ScrollToBottom),
            _ => None,
        }
    }
}
