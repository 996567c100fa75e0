use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use regex::Regex;

use crate::board::card::CardNode;
use crate::board::{Board, BoardEvent, PersistMode};
use crate::io::config_io::LoadedConfig;
use crate::io::http::HttpClient;
use crate::io::logging::init_file_logging;
use crate::io::remote::HttpBackend;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::status::{ColumnId, Status};
use crate::model::task::TaskId;
use crate::ops::search::highlight_regex;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search term
    Search,
    /// Carrying a card with the keyboard
    Grab,
    /// Detail popup open
    Detail,
    /// Waiting for a yes/no on deleting a task
    ConfirmDelete,
}

/// What a screen region stands for, filled in during render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A card, by element id
    Card(String),
    Column(ColumnId),
}

/// Detail popup state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub task_id: TaskId,
    /// Selected subtask row
    pub cursor: usize,
}

/// A line for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// An in-progress mouse gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MousePress {
    /// Element id of the card the button went down on
    pub element_id: String,
    /// The pointer moved while pressed: this is a drag, not a click
    pub dragged: bool,
}

/// Main application state
pub struct App {
    pub board: Board,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Column with the cursor, 0 = To do
    pub focused_column: usize,
    /// Cursor per column, an index into that column's visible cards
    pub card_cursor: [usize; 4],
    pub show_help: bool,
    /// Search mode: term being typed
    pub search_input: String,
    /// Filter active before search mode was entered, restored on Esc
    pub search_before: String,
    pub detail: Option<DetailState>,
    pub status_message: Option<StatusMessage>,
    /// Screen regions from the last render, topmost last
    pub hit_map: Vec<(Rect, HitTarget)>,
    pub mouse_press: Option<MousePress>,
    /// Directory holding the state file
    pub state_dir: Option<PathBuf>,
}

impl App {
    pub fn new(board: Board, theme: Theme) -> Self {
        App {
            board,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            focused_column: 0,
            card_cursor: [0; 4],
            show_help: false,
            search_input: String::new(),
            search_before: String::new(),
            detail: None,
            status_message: None,
            hit_map: Vec::new(),
            mouse_press: None,
            state_dir: None,
        }
    }

    pub fn focused_column_id(&self) -> ColumnId {
        Status::from_index(self.focused_column)
            .unwrap_or(Status::Todo)
            .column()
    }

    /// Visible cards of a column, in order
    pub fn visible_cards(&self, column: ColumnId) -> Vec<&CardNode> {
        self.board.view().column(column).visible_cards().collect()
    }

    /// Card under the cursor
    pub fn focused_card(&self) -> Option<&CardNode> {
        let column = self.focused_column_id();
        let cursor = self.card_cursor[self.focused_column];
        self.board.view().column(column).visible_cards().nth(cursor)
    }

    pub fn focused_task_id(&self) -> Option<TaskId> {
        self.focused_card().map(|c| c.task_id.clone())
    }

    /// Keep every cursor within its column
    pub fn clamp_cursors(&mut self) {
        for column in ColumnId::ALL {
            let count = self.board.view().column(column).visible_cards().count();
            let cursor = &mut self.card_cursor[column.index()];
            *cursor = (*cursor).min(count.saturating_sub(1));
        }
    }

    /// Put the cursor on a card, wherever it is
    pub fn select_card(&mut self, element_id: &str) -> bool {
        for column in ColumnId::ALL {
            if let Some(pos) = self
                .board
                .view()
                .column(column)
                .visible_cards()
                .position(|c| c.element_id == element_id)
            {
                self.focused_column = column.index();
                self.card_cursor[column.index()] = pos;
                return true;
            }
        }
        false
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Regex for highlighting the active filter
    pub fn active_search_re(&self) -> Option<Regex> {
        let term = if self.mode == Mode::Search {
            self.search_input.as_str()
        } else {
            self.board.filter()
        };
        highlight_regex(term)
    }

    /// First hit-map entry under a point, cards before columns
    pub fn hit_test(&self, x: u16, y: u16) -> Option<&HitTarget> {
        self.hit_map
            .iter()
            .rev()
            .find(|(rect, _)| point_in_rect(x, y, *rect))
            .map(|(_, target)| target)
    }

    /// Column under a point
    pub fn column_at(&self, x: u16, y: u16) -> Option<ColumnId> {
        self.hit_map.iter().find_map(|(rect, target)| match target {
            HitTarget::Column(id) if point_in_rect(x, y, *rect) => Some(*id),
            _ => None,
        })
    }

    /// Full reload, keeping the cursor on the same card when it survives
    pub fn reload(&mut self) {
        let keep = self.focused_card().map(|c| c.element_id.clone());
        match self.board.load() {
            Ok(()) => {
                if let Some(el) = keep {
                    self.select_card(&el);
                }
                self.clamp_cursors();
                self.close_detail_if_gone();
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.set_error(format!("reload failed: {}", e));
            }
        }
    }

    fn close_detail_if_gone(&mut self) {
        if let Some(detail) = &self.detail
            && self.board.task(&detail.task_id).is_none()
        {
            self.detail = None;
            if self.mode == Mode::Detail {
                self.mode = Mode::Navigate;
            }
        }
    }

    /// Per-tick housekeeping: queued reload events and persistence reports
    pub fn tick(&mut self) {
        match self.board.process_events() {
            Ok(0) => {}
            Ok(_) => {
                self.clamp_cursors();
                self.close_detail_if_gone();
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.set_error(format!("reload failed: {}", e));
            }
        }

        let failures = self.board.drain_reports();
        if let Some(last) = failures.last() {
            let suffix = if last.rolled_back { " (reverted)" } else { "" };
            self.set_error(format!("could not save task {}: {}{}", last.task_id, last.error, suffix));
            self.clamp_cursors();
        }
    }

    /// Ask the board to reload through its event channel
    pub fn request_reload(&self) {
        self.board.events().emit(BoardEvent::Refresh);
    }
}

pub fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

/// Restore cursor and filter from the state file
pub fn restore_ui_state(app: &mut App) {
    let Some(dir) = app.state_dir.clone() else {
        return;
    };
    let Some(state) = read_ui_state(&dir) else {
        return;
    };

    if let Some(term) = state.last_search.filter(|s| !s.trim().is_empty()) {
        app.board.set_filter(&term);
    }
    app.focused_column = state.focused_column.min(3);
    if let Some(el) = state.focused_card {
        app.select_card(&el);
    }
    app.clamp_cursors();
}

/// Save cursor and filter next to the config
pub fn save_ui_state(app: &App) {
    let Some(dir) = &app.state_dir else {
        return;
    };
    let filter = app.board.filter();
    let state = UiState {
        focused_column: app.focused_column,
        focused_card: app.focused_card().map(|c| c.element_id.clone()),
        last_search: (!filter.is_empty()).then(|| filter.to_string()),
    };
    if let Err(e) = write_ui_state(dir, &state) {
        tracing::warn!(error = %e, "could not save UI state");
    }
}

pub fn run(loaded: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = init_file_logging(&loaded.config.log);
    tracing::info!(config = ?loaded.path, "tack starting");

    let http = HttpClient::new(&loaded.config.backend)?;
    let backend = Arc::new(HttpBackend::new(http));
    let board = Board::new(backend, loaded.config.board.clone(), PersistMode::Background);

    let mut app = App::new(board, Theme::from_config(&loaded.config.ui));
    app.state_dir = loaded.dir().map(|d| d.to_path_buf());

    // A failed first load leaves an empty board; the error goes on the
    // status row and `r` retries.
    app.reload();
    restore_ui_state(&mut app);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!("tack exiting");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    // Debounced state save: every ~5 key presses
                    save_counter += 1;
                    if save_counter >= 5 {
                        save_ui_state(app);
                        save_counter = 0;
                    }
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
