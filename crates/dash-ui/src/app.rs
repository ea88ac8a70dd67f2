//! Main application state and TUI event loop for the trade-import dashboard.
//!
//! [`App`] owns the theme, the view mode, the filter panel cursor state and
//! the [`DashboardSession`]. Key presses become [`FilterChange`]s applied to
//! the session; the frame is redrawn from the session's current view.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::oneshot;

use dash_core::error::DashError;
use dash_core::filters::{FilterChange, FilterState};
use dash_runtime::loader::LoadOutcome;
use dash_runtime::record_store::LoadState;
use dash_runtime::session::DashboardSession;

use crate::chart_view;
use crate::components::filter_panel::{self, PanelState};
use crate::components::header::{Header, LoadSummary};
use crate::table_view;
use crate::themes::Theme;

/// Width of the filter column.
const PANEL_WIDTH: u16 = 32;

const KEY_HINTS: &str =
    "Tab/Shift+Tab focus  ↑/↓ move  Enter select  Del reset  c clear all  t charts/table  q quit";

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// What the right-hand column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Price and quantity trend charts.
    Charts,
    /// Monthly summary table.
    Table,
}

impl ViewMode {
    /// `"table"` selects the table; anything else the charts.
    pub fn from_name(name: &str) -> Self {
        match name {
            "table" => ViewMode::Table,
            _ => ViewMode::Charts,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Charts => ViewMode::Table,
            ViewMode::Table => ViewMode::Charts,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Where the records come from, as shown in the header.
    pub source_label: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    pub panel: PanelState,
    session: DashboardSession,
}

impl App {
    pub fn new(
        theme_name: &str,
        view_mode: ViewMode,
        source_label: String,
        initial_filters: FilterState,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            source_label,
            should_quit: false,
            panel: PanelState::default(),
            session: DashboardSession::new(initial_filters),
        }
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Hand the loader's outcome to the session.
    pub fn finish_load(&mut self, outcome: LoadOutcome) {
        self.session.finish_load(outcome);
        self.panel.clamp(&self.session.view().options);
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// the terminal event loop stays on the current thread while the record
    /// load completes on its own task and is picked up via `try_recv`.
    pub async fn run(mut self, rx: oneshot::Receiver<LoadOutcome>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, rx);

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        // Filters and views only mean something once records are in.
        if !self.session.store().is_ready() {
            return;
        }

        match key.code {
            KeyCode::Tab => self.panel.focus_next(),
            KeyCode::BackTab => self.panel.focus_previous(),
            KeyCode::Up => self.panel.move_up(),
            KeyCode::Down => {
                let len = self.session.view().options.len(self.panel.focus) + 1;
                self.panel.move_down(len);
            }
            KeyCode::Enter => self.select_at_cursor(),
            KeyCode::Backspace | KeyCode::Delete => {
                let field = self.panel.focus;
                self.apply(FilterChange::Reset(field));
                self.panel.set_cursor(field, 0);
            }
            KeyCode::Char('c') => {
                self.apply(FilterChange::ClearAll);
            }
            KeyCode::Char('t') => self.view_mode = self.view_mode.toggled(),
            _ => {}
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        rx: oneshot::Receiver<LoadOutcome>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);
        let mut pending = Some(rx);

        loop {
            terminal
                .draw(|frame| self.render(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            if let Some(rx) = pending.as_mut() {
                match rx.try_recv() {
                    Ok(outcome) => {
                        self.finish_load(outcome);
                        pending = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {}
                    Err(oneshot::error::TryRecvError::Closed) => {
                        self.finish_load(Err(DashError::Fetch {
                            url: self.source_label.clone(),
                            message: "record loader stopped before finishing".to_string(),
                        }));
                        pending = None;
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Apply the entry under the focused cursor, then keep the cursor on the
    /// same label if it is still listed.
    fn select_at_cursor(&mut self) {
        let field = self.panel.focus;
        let cursor = self.panel.cursor(field);
        let options = &self.session.view().options;
        let label = filter_panel::entries(options, field).get(cursor).cloned();

        if let Some(change) = filter_panel::change_for(options, field, cursor) {
            self.apply(change);
        }

        let entries = filter_panel::entries(&self.session.view().options, field);
        if let Some(pos) = label.and_then(|l| entries.iter().position(|e| *e == l)) {
            self.panel.set_cursor(field, pos);
        }
    }

    fn apply(&mut self, change: FilterChange) {
        if self.session.apply(change) {
            tracing::debug!(filters = %self.session.filters(), "filters changed");
        }
        self.panel.clamp(&self.session.view().options);
    }

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let [header_area, body, footer] = Layout::vertical([
            Constraint::Length(Header::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let view = self.session.view();
        let loaded = match self.session.load_state() {
            LoadState::Ready { loaded_at, skipped } => Some(LoadSummary {
                total: self.session.store().records().len(),
                shown: view.filtered_count,
                skipped: *skipped,
                loaded_at: *loaded_at,
            }),
            _ => None,
        };
        let header = Header::new(&self.source_label, loaded, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        match self.session.load_state() {
            LoadState::Loading => self.render_message(frame, body, "Loading...", false),
            LoadState::Failed { message } => self.render_message(frame, body, message, true),
            LoadState::Ready { .. } => {
                let [left, right] = Layout::horizontal([
                    Constraint::Length(PANEL_WIDTH),
                    Constraint::Min(0),
                ])
                .areas(body);

                filter_panel::render_filter_panel(
                    frame,
                    left,
                    &view.options,
                    self.session.filters(),
                    &self.panel,
                    &self.theme,
                );
                match self.view_mode {
                    ViewMode::Charts => chart_view::render_charts(frame, right, view, &self.theme),
                    ViewMode::Table => table_view::render_table_view(
                        frame,
                        right,
                        &view.summary,
                        &view.totals,
                        &self.theme,
                    ),
                }
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(KEY_HINTS, self.theme.dim))),
            footer,
        );
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, message: &str, is_error: bool) {
        let style = if is_error {
            self.theme.error
        } else {
            self.theme.info
        };
        let text = vec![Line::from(""), Line::from(Span::styled(message.to_string(), style))];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(self.theme.border)),
            area,
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
