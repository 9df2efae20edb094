use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind, poll,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crate::ViewerOptions;
use crate::source::{LogSource, ResourceId};

pub mod application;
pub mod constants;
pub mod domain;
pub mod ui;

use self::application::fetch_service::FetchService;
use self::constants::*;
use self::domain::models::{FetchRequest, FetchResponse, Mode};
use self::ui::{
    app_state::AppState, commands::Command, components::Component, events::Message,
    renderer::Renderer,
};

pub struct InteractiveViewer {
    state: AppState,
    renderer: Renderer,
    fetch_service: Arc<FetchService>,
    fetch_sender: Option<Sender<FetchRequest>>,
    fetch_receiver: Option<Receiver<FetchResponse>>,
    scheduled_load_older: Option<(Instant, Duration, u64)>,
    last_ctrl_c_press: Option<Instant>,
    message_timer: Option<Instant>,
    message_clear_delay: u64,
}

impl InteractiveViewer {
    pub fn new(options: ViewerOptions, source: Arc<dyn LogSource>) -> Self {
        Self {
            state: AppState::new(&options, Vec::new()),
            renderer: Renderer::new(),
            fetch_service: Arc::new(FetchService::new(source)),
            fetch_sender: None,
            fetch_receiver: None,
            scheduled_load_older: None,
            last_ctrl_c_press: None,
            message_timer: None,
            message_clear_delay: MESSAGE_CLEAR_DELAY_MS,
        }
    }

    pub fn run(&mut self, resources: Vec<ResourceId>) -> Result<()> {
        let Some(first) = resources.first().cloned() else {
            anyhow::bail!("No log file given");
        };
        self.state.resources.list = resources;

        let (tx, rx) = self.fetch_service.clone().start_worker();
        self.fetch_sender = Some(tx);
        self.fetch_receiver = Some(rx);

        let mut terminal = self.setup_terminal()?;
        self.handle_message(Message::SelectResource(first));

        let result = self.run_app(&mut terminal);

        self.cleanup_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn cleanup_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            // Measure, settle scroll corrections, then paint
            let mut layout_command = Command::None;
            terminal.draw(|f| {
                let metrics = self.renderer.measure(f.area(), &self.state);
                layout_command = self.state.update(Message::Layout {
                    content_height: metrics.content_height,
                    viewport_height: metrics.viewport_height,
                });
                self.renderer.render(f, &self.state);
            })?;
            self.execute_command(layout_command);

            // Check for fetch results
            let responses: Vec<FetchResponse> = match &self.fetch_receiver {
                Some(receiver) => receiver.try_iter().collect(),
                None => Vec::new(),
            };
            for response in responses {
                let msg = match response.result {
                    Ok(text) => Message::FetchCompleted {
                        generation: response.generation,
                        kind: response.kind,
                        text,
                    },
                    Err(error) => Message::FetchFailed {
                        generation: response.generation,
                        kind: response.kind,
                        error,
                    },
                };
                self.handle_message(msg);
            }

            // Check for tail tick
            if self.state.tailing.is_due(Instant::now()) {
                self.handle_message(Message::TailTick);
            }

            // Check for scheduled backward load
            if let Some((started, delay, generation)) = self.scheduled_load_older
                && started.elapsed() >= delay
            {
                self.scheduled_load_older = None;
                self.handle_message(Message::LoadOlderReady(generation));
            }

            // Check for scheduled message clear
            if let Some(timer) = self.message_timer
                && timer.elapsed() >= Duration::from_millis(self.message_clear_delay)
            {
                self.message_timer = None;
                self.execute_command(Command::ClearMessage);
            }

            if poll(Duration::from_millis(EVENT_POLL_INTERVAL_MS))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_input(key)? {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollUp => {
                            self.handle_message(Message::ScrollUp(MOUSE_SCROLL_ROWS))
                        }
                        MouseEventKind::ScrollDown => {
                            self.handle_message(Message::ScrollDown(MOUSE_SCROLL_ROWS))
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        // Global Ctrl+C handling for exit
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if let Some(last_press) = self.last_ctrl_c_press
                && last_press.elapsed() < Duration::from_secs(DOUBLE_CTRL_C_TIMEOUT_SECS)
            {
                return Ok(true);
            }
            self.last_ctrl_c_press = Some(Instant::now());
            self.state.ui.message = Some(EXIT_PROMPT.to_string());
            self.message_timer = Some(Instant::now());
            self.message_clear_delay = MESSAGE_CLEAR_DELAY_MS;
            return Ok(false);
        }

        let message = match self.state.mode {
            Mode::Search => self.renderer.get_log_header_mut().handle_key(key),
            Mode::Help => self.renderer.get_help_dialog_mut().handle_key(key),
            Mode::Viewer => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => self.handle_viewer_input(key),
            },
        };

        if let Some(msg) = message {
            self.handle_message(msg);
        }

        Ok(false)
    }

    fn handle_viewer_input(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('?') => Some(Message::ShowHelp),
            KeyCode::Char('/') => Some(Message::EnterSearch),
            KeyCode::Char('t') => Some(Message::ToggleTailing),
            KeyCode::Char('e') => Some(Message::ToggleExpand),
            KeyCode::Char('r') => Some(Message::Reload),
            KeyCode::Char(']') => Some(Message::NextResource),
            KeyCode::Char('[') => Some(Message::PreviousResource),
            _ => self.renderer.get_log_view_mut().handle_key(key),
        }
    }

    fn handle_message(&mut self, message: Message) {
        let command = self.state.update(message);
        self.execute_command(command);
    }

    fn execute_command(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Fetch(request) => {
                if let Some(sender) = &self.fetch_sender
                    && sender.send(request).is_err()
                {
                    tracing::error!("fetch worker is gone");
                    self.handle_message(Message::SetStatus("Background reader stopped".to_string()));
                }
            }
            Command::ScheduleLoadOlder {
                generation,
                delay_ms,
            } => {
                self.scheduled_load_older =
                    Some((Instant::now(), Duration::from_millis(delay_ms), generation));
            }
            Command::ClearMessage => {
                self.state.ui.message = None;
                self.message_timer = None;
            }
            Command::ScheduleClearMessage(delay) => {
                self.message_timer = Some(Instant::now());
                self.message_clear_delay = delay;
            }
        }
    }
}
