use crossterm::event::{KeyCode, KeyEvent};

use crate::model::status::Direction;
use crate::tui::app::{App, Mode};

use super::navigate::step;

pub(super) fn handle_detail(app: &mut App, key: KeyEvent) {
    let Some(task_id) = app.detail.as_ref().map(|d| d.task_id.clone()) else {
        app.mode = Mode::Navigate;
        return;
    };
    let subtask_count = app.board.task(&task_id).map_or(0, |t| t.subtasks.len());

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
            app.detail = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(detail) = &mut app.detail {
                detail.cursor = detail.cursor.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(detail) = &mut app.detail {
                detail.cursor = (detail.cursor + 1).min(subtask_count.saturating_sub(1));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            let cursor = app.detail.as_ref().map_or(0, |d| d.cursor);
            if app.board.toggle_subtask(&task_id, cursor).is_none() {
                tracing::debug!(task = %task_id, cursor, "no subtask to toggle");
            }
        }
        KeyCode::Char('>') | KeyCode::Char('.') => step(app, Direction::Forward),
        KeyCode::Char('<') | KeyCode::Char(',') => step(app, Direction::Back),
        _ => {}
    }
}
