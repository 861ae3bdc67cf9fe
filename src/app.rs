use std::{error::Error as _, io};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, error, info};

use crate::{config::ColumnWidths, docker::ContainerRow, error::FetchError, table::ContainerTable};

pub const HEADER: &str = "Running Docker Containers:";
pub const FOOTER: &str = "Press q to quit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
}

/// View state: the table built from the startup fetch, the fetch error if
/// there was one, and whether the event loop should keep going.
#[derive(Debug)]
pub struct App {
    table: ContainerTable,
    error: Option<FetchError>,
    state: State,
}

impl App {
    /// Build the initial view from the result of the startup fetch. On error
    /// the table stays empty and the error is shown instead.
    pub fn new(fetched: Result<Vec<ContainerRow>, FetchError>, widths: ColumnWidths) -> Self {
        let (rows, error) = match fetched {
            Ok(rows) => (rows, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        Self {
            table: ContainerTable::new(rows, widths),
            error,
            state: State::Running,
        }
    }

    pub fn table(&self) -> &ContainerTable {
        &self.table
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Quit on `q` or Ctrl+C, hand everything else to the table.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if is_quit(key) {
                info!("quit requested");
                self.state = State::Terminated;
                return;
            }
        }
        self.table.handle_event(event);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let [_, header, _, body, _, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Line::raw(HEADER), header);
        match &self.error {
            Some(e) => frame.render_widget(
                Paragraph::new(format!("Error: {}", error_chain(e))).wrap(Wrap { trim: false }),
                body,
            ),
            None => self.table.render(frame, body),
        }
        frame.render_widget(Line::raw(FOOTER), footer);
    }

    /// Take over the terminal and run until the user quits. The terminal is
    /// restored whether or not the loop fails.
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("entering alternate screen");
        }

        let result = Terminal::new(CrosstermBackend::new(stdout))
            .context("creating terminal")
            .and_then(|mut terminal| {
                let result = self.event_loop(&mut terminal);
                let _ = terminal.show_cursor();
                result
            });

        if let Err(e) = &result {
            error!("event loop failed: {e:#}");
        }
        let raw_mode = disable_raw_mode().context("disabling raw mode");
        let screen =
            execute!(io::stdout(), LeaveAlternateScreen).context("leaving alternate screen");
        first_error(result, [raw_mode, screen])
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        debug!(rows = self.table.len(), "starting event loop");
        while self.is_running() {
            terminal
                .draw(|frame| self.render(frame))
                .context("drawing frame")?;
            let event = event::read().context("reading terminal event")?;
            self.handle_event(&event);
        }
        Ok(())
    }
}

/// The loop's own error wins; restore errors only surface after a clean loop.
fn first_error(result: Result<()>, restore: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    result?;
    restore.into_iter().collect()
}

/// `message: cause: cause`, one entry per error in the source chain.
fn error_chain(error: &FetchError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => key.modifiers.is_empty(),
        _ => false,
    }
}
