use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::{Value, json};

use crate::board::{Board, PersistMode};
use crate::io::remote::{Backend, RemoteError, decode_tasks, decode_users};
use crate::model::config::BoardConfig;
use crate::model::task::{Task, TaskDraft, TaskId, TaskRaw};
use crate::model::user::UserRaw;
use crate::tui::app::App;
use crate::tui::theme::Theme;

/// Four tasks: two in To do, one in progress, one done
pub const SAMPLE_TASKS: &str = r#"{
    "1": {
        "title": "Login form",
        "description": "Email and password fields",
        "dueDate": "2030-02-01",
        "category": "User_Story",
        "prio": "Urgent",
        "assignedUsers": ["Anna Berg"],
        "subtasks": ["html", "css"],
        "subtaskDone": [true, false],
        "status": "todo"
    },
    "2": {"title": "Write docs", "description": "Explain the board", "prio": "Low", "status": "todo"},
    "3": {"title": "API client", "description": "Wrap the REST endpoints", "category": "Technical_Task", "status": "in-progress"},
    "4": {"title": "Deploy", "description": "Ship it", "status": "done"}
}"#;

/// Backend serving fixed snapshots and accepting every write
pub struct StaticBackend {
    tasks: Value,
    users: Value,
    pub puts: Mutex<Vec<Task>>,
}

impl StaticBackend {
    pub fn new(tasks: &str) -> Self {
        StaticBackend {
            tasks: serde_json::from_str(tasks).unwrap(),
            users: json!({"u1": {"userFullName": "Anna Berg", "userInitials": "AB", "userColor": "user-color-1"}}),
            puts: Mutex::new(Vec::new()),
        }
    }
}

impl Backend for StaticBackend {
    fn fetch_tasks(&self) -> Result<IndexMap<String, TaskRaw>, RemoteError> {
        Ok(decode_tasks(&self.tasks))
    }
    fn fetch_users(&self) -> Result<IndexMap<String, UserRaw>, RemoteError> {
        Ok(decode_users(&self.users))
    }
    fn put_task(&self, task: &Task) -> Result<(), RemoteError> {
        self.puts.lock().unwrap().push(task.clone());
        Ok(())
    }
    fn delete_task(&self, _id: &TaskId) -> Result<(), RemoteError> {
        Ok(())
    }
    fn create_task(&self, _draft: &TaskDraft) -> Result<TaskId, RemoteError> {
        Ok(TaskId::new("new"))
    }
    fn put_user(&self, _id: &str, _user: &UserRaw) -> Result<(), RemoteError> {
        Ok(())
    }
}

/// A loaded app over a static backend, writes done inline
pub fn app_with_tasks(tasks: &str) -> App {
    let backend = Arc::new(StaticBackend::new(tasks));
    let mut board = Board::new(backend, BoardConfig::default(), PersistMode::Inline);
    board.load().unwrap();
    App::new(board, Theme::default())
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Render the whole app once; fills the hit map
pub fn draw(app: &mut App, w: u16, h: u16) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| super::render(frame, app))
        .unwrap();
    terminal
}

/// Render the whole app and return plain text (no styles)
pub fn draw_to_string(app: &mut App, w: u16, h: u16) -> String {
    let terminal = draw(app, w, h);
    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
