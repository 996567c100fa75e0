use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

/// y deletes the focused task, anything else cancels
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    app.mode = Mode::Navigate;
    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        app.status_message = None;
        return;
    }
    let Some(id) = app.focused_task_id() else {
        return;
    };
    match app.board.delete_task(&id) {
        Ok(()) => {
            app.clamp_cursors();
            app.set_status(format!("Deleted task {}", id));
        }
        Err(e) => {
            tracing::error!(task = %id, error = %e, "delete failed");
            app.set_error(format!("delete failed: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use crate::tui::render::test_helpers::{SAMPLE_TASKS, app_with_tasks, key};

    #[test]
    fn y_deletes_focused_task() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.mode = Mode::ConfirmDelete;
        handle_confirm(&mut app, key(KeyCode::Char('y')));
        assert!(app.board.task(&TaskId::new("1")).is_none());
        assert!(app.board.view().card("task-1").is_none());
        assert_eq!(app.focused_card().unwrap().element_id, "task-2");
    }

    #[test]
    fn other_key_cancels() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.mode = Mode::ConfirmDelete;
        handle_confirm(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.board.task(&TaskId::new("1")).is_some());
    }
}
