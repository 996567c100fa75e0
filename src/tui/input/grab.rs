use crossterm::event::{KeyCode, KeyEvent};

use crate::model::status::Status;
use crate::tui::app::{App, Mode};

use super::navigate::report_transition;

/// Keyboard drag: left/right moves the drop target, Enter drops, Esc puts
/// the card back
pub(super) fn handle_grab(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.board.drag_cancel();
            app.mode = Mode::Navigate;
        }
        KeyCode::Left | KeyCode::Char('h') => shift_target(app, -1),
        KeyCode::Right | KeyCode::Char('l') => shift_target(app, 1),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
            let target = app
                .board
                .drag_target()
                .map(|c| c.dom_id())
                .unwrap_or_default();
            let dragged = app.board.dragging().map(str::to_string);
            let outcome = app.board.drop_on(target);
            report_transition(app, &outcome);
            app.mode = Mode::Navigate;
            if let Some(el) = dragged {
                app.select_card(&el);
            }
            app.clamp_cursors();
        }
        _ => {}
    }
}

fn shift_target(app: &mut App, delta: isize) {
    let current = app
        .board
        .drag_target()
        .map(|c| c.index())
        .unwrap_or(app.focused_column) as isize;
    let next = (current + delta).clamp(0, Status::ALL.len() as isize - 1) as usize;
    if let Some(status) = Status::from_index(next) {
        app.board.drag_over(status.column());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use crate::tui::render::test_helpers::{SAMPLE_TASKS, app_with_tasks, key};

    #[test]
    fn grab_and_drop_two_columns_over() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        assert!(app.board.drag_start("task-2"));
        app.board.drag_over(Status::Todo.column());
        app.mode = Mode::Grab;

        handle_grab(&mut app, key(KeyCode::Right));
        handle_grab(&mut app, key(KeyCode::Right));
        assert!(app.board.view().column(Status::AwaitFeedback.column()).drag_over);

        handle_grab(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(
            app.board.task(&TaskId::new("2")).unwrap().status,
            Status::AwaitFeedback
        );
        assert_eq!(app.focused_card().unwrap().element_id, "task-2");
        assert!(app.board.view().columns().iter().all(|c| !c.drag_over));
    }

    #[test]
    fn esc_leaves_task_in_place() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.board.drag_start("task-1");
        app.board.drag_over(Status::Todo.column());
        app.mode = Mode::Grab;
        handle_grab(&mut app, key(KeyCode::Right));
        handle_grab(&mut app, key(KeyCode::Esc));

        assert_eq!(app.board.task(&TaskId::new("1")).unwrap().status, Status::Todo);
        assert!(app.board.dragging().is_none());
        assert!(app.board.view().columns().iter().all(|c| !c.drag_over));
    }
}
