use std::borrow::Cow;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::{config::ColumnWidths, docker::ContainerRow};

pub const TITLES: [&str; 5] = ["ID", "Name", "Image", "Status", "Ports"];

/// Lines taken by the header row and the rule below it.
const HEADER_HEIGHT: u16 = 2;

/// Body rows assumed visible before the first render.
const DEFAULT_HEIGHT: usize = 20;

/// Cursor movements bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    Top,
    Bottom,
}

impl Motion {
    /// Key map of the table:
    /// up/k, down/j, pgup/b, pgdown/f/space, u/ctrl+u, d/ctrl+d, home/g, end/G.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let plain = !key.modifiers.contains(KeyModifiers::CONTROL)
            && !key.modifiers.contains(KeyModifiers::ALT);
        let motion = match key.code {
            KeyCode::Up => Self::LineUp,
            KeyCode::Down => Self::LineDown,
            KeyCode::PageUp => Self::PageUp,
            KeyCode::PageDown => Self::PageDown,
            KeyCode::Home => Self::Top,
            KeyCode::End => Self::Bottom,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Self::HalfPageUp
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Self::HalfPageDown
            }
            KeyCode::Char(c) if plain => match c {
                'k' => Self::LineUp,
                'j' => Self::LineDown,
                'b' => Self::PageUp,
                'f' | ' ' => Self::PageDown,
                'u' => Self::HalfPageUp,
                'd' => Self::HalfPageDown,
                'g' => Self::Top,
                'G' => Self::Bottom,
                _ => return None,
            },
            _ => return None,
        };
        Some(motion)
    }
}

/// Scrollable table of containers. Owns the rows, the column layout and the
/// cursor; reacts to its own key map and ignores every other event.
#[derive(Debug)]
pub struct ContainerTable {
    rows: Vec<ContainerRow>,
    widths: ColumnWidths,
    state: TableState,
    height: usize,
}

impl ContainerTable {
    pub fn new(rows: Vec<ContainerRow>, widths: ColumnWidths) -> Self {
        let selected = if rows.is_empty() { None } else { Some(0) };
        Self {
            rows,
            widths,
            state: TableState::default().with_selected(selected),
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn rows(&self) -> &[ContainerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the highlighted row, `None` when the table is empty.
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Body rows visible in the last render.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Feed a terminal event to the table.
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if let Some(motion) = Motion::from_key(key) {
                self.apply(motion);
            }
        }
    }

    pub fn apply(&mut self, motion: Motion) {
        let half = (self.height / 2).max(1);
        match motion {
            Motion::LineUp => self.move_up(1),
            Motion::LineDown => self.move_down(1),
            Motion::PageUp => self.move_up(self.height),
            Motion::PageDown => self.move_down(self.height),
            Motion::HalfPageUp => self.move_up(half),
            Motion::HalfPageDown => self.move_down(half),
            Motion::Top => self.goto(0),
            Motion::Bottom => self.goto(self.rows.len().saturating_sub(1)),
        }
    }

    pub fn move_up(&mut self, n: usize) {
        if let Some(selected) = self.state.selected() {
            self.goto(selected.saturating_sub(n));
        }
    }

    pub fn move_down(&mut self, n: usize) {
        if let Some(selected) = self.state.selected() {
            self.goto(selected.saturating_add(n));
        }
    }

    fn goto(&mut self, index: usize) {
        if self.rows.is_empty() {
            return;
        }
        self.state.select(Some(index.min(self.rows.len() - 1)));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.height = usize::from(area.height.saturating_sub(HEADER_HEIGHT)).max(1);

        let widths = self.widths.as_array();
        let header = Row::new(TITLES.iter().zip(widths).map(|(title, width)| {
            Cell::from(truncate(title, width).into_owned())
        }))
        .style(Style::new().add_modifier(Modifier::BOLD))
        .bottom_margin(1);
        let rows = self.rows.iter().map(|row| {
            Row::new(
                row.cells()
                    .into_iter()
                    .zip(widths)
                    .map(|(value, width)| Cell::from(truncate(value, width).into_owned())),
            )
        });

        let table = Table::new(rows, widths.map(Constraint::Length))
            .header(header)
            .row_highlight_style(
                Style::new()
                    .fg(Color::Indexed(229))
                    .bg(Color::Indexed(57))
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(table, area, &mut self.state);

        // The header's bottom margin holds the rule.
        if area.height >= HEADER_HEIGHT {
            let spacing = u16::try_from(widths.len() - 1).unwrap_or_default();
            let rule = Rect {
                y: area.y + 1,
                height: 1,
                width: widths
                    .iter()
                    .fold(spacing, |total, width| total.saturating_add(*width))
                    .min(area.width),
                ..area
            };
            frame.render_widget(Block::new().borders(Borders::TOP), rule);
        }
    }
}

/// Cut `value` to `width` characters, marking the cut with an ellipsis.
fn truncate(value: &str, width: u16) -> Cow<'_, str> {
    let width = usize::from(width);
    if value.chars().count() <= width {
        return Cow::Borrowed(value);
    }
    if width == 0 {
        return Cow::Borrowed("");
    }
    let mut cut: String = value.chars().take(width - 1).collect();
    cut.push('…');
    Cow::Owned(cut)
}
