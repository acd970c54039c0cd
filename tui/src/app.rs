//! Main Application
//!
//! The App is a thin display client: drivers write into [`DisplayLines`]
//! from timer callbacks on the same `LocalSet`, and the App redraws them at
//! a fixed frame rate while watching the keyboard.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use txt_rotate_core::{ElementId, Mode, StateStore};

use crate::surface::DisplayLines;
use crate::theme;

/// Redraw interval (~30 fps)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Caret blink half-period
const CARET_BLINK_MS: u128 = 500;

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Lines written by the drivers
    lines: DisplayLines,
    /// Store the drivers run against (read-only here)
    store: Rc<StateStore>,
    /// Widest candidate, for a stable left edge
    column_width: u16,
    /// Start time (for the caret blink)
    started: Instant,
}

impl App {
    /// Create an App showing `lines`
    pub fn new(lines: DisplayLines, store: Rc<StateStore>) -> Self {
        let column_width = store
            .ids()
            .into_iter()
            .filter_map(|id| store.read(id).ok())
            .flat_map(|state| state.candidates.into_iter())
            .map(|c| c.width())
            .max()
            .unwrap_or(0);

        Self {
            running: true,
            lines,
            store,
            column_width: u16::try_from(column_width + 1).unwrap_or(u16::MAX),
            started: Instant::now(),
        }
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run the draw/event loop until the user quits
    ///
    /// # Errors
    ///
    /// Fails if drawing or reading terminal events fails.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut frame_timer = tokio::time::interval(FRAME_DURATION);
        frame_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        while self.running {
            tokio::select! {
                _ = frame_timer.tick() => {
                    terminal.draw(|frame| self.draw(frame))?;
                }
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(&event),
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        tracing::debug!("Terminal event stream closed");
                        self.running = false;
                    }
                },
            }
        }

        tracing::info!(restarts = self.store.restart_count(), "Exiting");
        Ok(())
    }

    /// React to one terminal event
    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.running = false;
                }
                _ => {}
            }
        }
    }

    /// Draw every line plus the status bar
    pub fn draw(&self, frame: &mut Frame) {
        let [body, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        let block = Block::bordered()
            .title(" txt-rotate ")
            .border_style(Style::default().fg(theme::MUTED));
        let inner = block.inner(body);
        frame.render_widget(block, body);
        frame.render_widget(self.body(inner), inner);
        frame.render_widget(self.status(), status);
    }

    fn body(&self, area: Rect) -> Paragraph<'static> {
        let caret_on = self.started.elapsed().as_millis() / CARET_BLINK_MS % 2 == 0;
        let indent = " ".repeat(usize::from(area.width.saturating_sub(self.column_width) / 2));
        let snapshot = self.lines.snapshot();
        let top = usize::from(area.height).saturating_sub(self.store.len()) / 2;

        let mut lines: Vec<Line<'static>> = vec![Line::default(); top];
        for (index, line) in snapshot.into_iter().enumerate() {
            // Targets only see typing/deleting frames; idleness lives in the store.
            // Elements rejected at start-up are not in the store and are not drawn.
            let Ok(state) = self.store.read(ElementId(index)) else {
                continue;
            };
            let mode = state.mode;
            let caret = if caret_on || mode != Mode::Idle {
                theme::CARET_GLYPH
            } else {
                " "
            };
            lines.push(Line::from(vec![
                Span::raw(indent.clone()),
                Span::styled(line.text, theme::text_style(mode)),
                Span::styled(caret, theme::caret_style()),
            ]));
        }

        Paragraph::new(lines)
    }

    fn status(&self) -> Paragraph<'static> {
        Paragraph::new(format!(
            " phase: {}  restarts: {}  elements: {}  q to quit",
            self.store.phase(),
            self.store.restart_count(),
            self.store.len()
        ))
        .style(Style::default().fg(theme::MUTED))
    }
}
