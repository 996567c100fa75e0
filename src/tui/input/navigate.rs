use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::board::{Abort, Transition};
use crate::model::status::{Direction, Status};

use crate::tui::app::{App, DetailState, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Cursor
        (_, KeyCode::Left | KeyCode::Char('h')) => focus_column(app, -1),
        (_, KeyCode::Right | KeyCode::Char('l')) => focus_column(app, 1),
        (_, KeyCode::Up | KeyCode::Char('k')) => move_cursor(app, -1),
        (_, KeyCode::Down | KeyCode::Char('j')) => move_cursor(app, 1),
        (_, KeyCode::Char('g')) => app.card_cursor[app.focused_column] = 0,
        (_, KeyCode::Char('G')) => {
            let count = app.visible_cards(app.focused_column_id()).len();
            app.card_cursor[app.focused_column] = count.saturating_sub(1);
        }

        (_, KeyCode::Enter) => open_detail(app),
        (_, KeyCode::Char('/')) => {
            app.search_before = app.board.filter().to_string();
            app.search_input = app.search_before.clone();
            app.mode = Mode::Search;
        }
        (_, KeyCode::Esc) => {
            if !app.board.filter().is_empty() {
                app.board.set_filter("");
                app.clamp_cursors();
            }
        }

        // Moves
        (_, KeyCode::Char('m') | KeyCode::Char(' ')) => start_grab(app),
        (_, KeyCode::Char('>') | KeyCode::Char('.')) => step(app, Direction::Forward),
        (_, KeyCode::Char('<') | KeyCode::Char(',')) => step(app, Direction::Back),

        (_, KeyCode::Char('x')) => {
            if let Some(card) = app.focused_card() {
                let msg = format!("Delete \"{}\"? y/n", card.title);
                app.set_status(msg);
                app.mode = Mode::ConfirmDelete;
            }
        }
        (_, KeyCode::Char('r')) => {
            app.request_reload();
            app.set_status("Reloading…");
        }
        _ => {}
    }
}

fn focus_column(app: &mut App, delta: isize) {
    let next = app.focused_column as isize + delta;
    if (0..Status::ALL.len() as isize).contains(&next) {
        app.focused_column = next as usize;
        app.clamp_cursors();
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let count = app.visible_cards(app.focused_column_id()).len();
    if count == 0 {
        return;
    }
    let cursor = &mut app.card_cursor[app.focused_column];
    let next = (*cursor as isize + delta).clamp(0, count as isize - 1);
    *cursor = next as usize;
}

/// Open the detail popup for the card under the cursor
pub(super) fn open_detail(app: &mut App) {
    if let Some(task_id) = app.focused_task_id() {
        app.detail = Some(DetailState { task_id, cursor: 0 });
        app.mode = Mode::Detail;
    }
}

/// Pick up the card under the cursor
fn start_grab(app: &mut App) {
    let Some(element_id) = app.focused_card().map(|c| c.element_id.clone()) else {
        return;
    };
    if app.board.drag_start(&element_id) {
        let column = app.focused_column_id();
        app.board.drag_over(column);
        app.mode = Mode::Grab;
    }
}

/// One-column move of the focused task, cursor follows the card
pub(super) fn step(app: &mut App, direction: Direction) {
    let Some(id) = app.focused_task_id() else {
        return;
    };
    let outcome = app.board.move_one_column(&id, direction);
    report_transition(app, &outcome);
    if !outcome.is_aborted() {
        app.select_card(&id.dom_id());
    }
}

/// Put the outcome of a move on the status row
pub(super) fn report_transition(app: &mut App, outcome: &Transition) {
    match outcome {
        Transition::Moved { id, to, .. } => {
            let title = app.board.task(id).map(|t| t.title.clone()).unwrap_or_default();
            app.set_status(format!("\"{}\" → {}", title, to.label()));
        }
        Transition::Unchanged { .. } => {}
        Transition::Aborted(Abort::AtBoundary(status)) => {
            app.set_status(format!("Already in {}", status.label()));
        }
        Transition::Aborted(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_tasks, key, SAMPLE_TASKS};

    #[test]
    fn cursor_moves_within_and_across_columns() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        assert_eq!(app.focused_card().unwrap().element_id, "task-1");

        handle_navigate(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.focused_card().unwrap().element_id, "task-2");
        handle_navigate(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.focused_card().unwrap().element_id, "task-2");

        handle_navigate(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.focused_card().unwrap().element_id, "task-3");
        handle_navigate(&mut app, key(KeyCode::Right));
        handle_navigate(&mut app, key(KeyCode::Right));
        handle_navigate(&mut app, key(KeyCode::Right));
        assert_eq!(app.focused_column, 3);
    }

    #[test]
    fn step_moves_task_and_cursor() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        handle_navigate(&mut app, key(KeyCode::Char('>')));
        let id = crate::model::TaskId::new("1");
        assert_eq!(app.board.task(&id).unwrap().status, Status::InProgress);
        assert_eq!(app.focused_card().unwrap().element_id, "task-1");
        assert_eq!(app.focused_column, 1);

        handle_navigate(&mut app, key(KeyCode::Char('<')));
        handle_navigate(&mut app, key(KeyCode::Char('<')));
        assert_eq!(app.board.task(&id).unwrap().status, Status::Todo);
        assert_eq!(app.status_message.as_ref().unwrap().text, "Already in To do");
    }

    #[test]
    fn enter_opens_detail() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        handle_navigate(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Detail);
        assert_eq!(app.detail.as_ref().unwrap().task_id.as_str(), "1");
    }
}
