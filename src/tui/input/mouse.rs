use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, HitTarget, Mode, MousePress};

use super::navigate::{open_detail, report_transition};

/// Pointer drag-and-drop and click-to-open.
///
/// Button down on a card starts a drag; moving with the button held shows
/// the drag-over hint on the column under the pointer; releasing drops on
/// that column. A press and release without movement is a click and opens
/// the card's detail popup.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        if matches!(mouse.kind, MouseEventKind::Down(_)) {
            app.show_help = false;
        }
        return;
    }
    if !matches!(app.mode, Mode::Navigate | Mode::Detail) && app.mouse_press.is_none() {
        return;
    }

    let (x, y) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(HitTarget::Card(element_id)) = app.hit_test(x, y).cloned() else {
                if let Some(column) = app.column_at(x, y) {
                    app.focused_column = column.index();
                    app.clamp_cursors();
                }
                return;
            };
            app.detail = None;
            app.mode = Mode::Navigate;
            app.select_card(&element_id);
            if app.board.drag_start(&element_id) {
                app.mouse_press = Some(MousePress {
                    element_id,
                    dragged: false,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(press) = &mut app.mouse_press else {
                return;
            };
            press.dragged = true;
            let over = app.column_at(x, y);
            match over {
                Some(column) => app.board.drag_over(column),
                None => {
                    if let Some(prev) = app.board.drag_target() {
                        app.board.drag_leave(prev);
                    }
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(press) = app.mouse_press.take() else {
                return;
            };
            if !press.dragged {
                app.board.drag_cancel();
                open_detail(app);
                return;
            }
            let target = app.column_at(x, y).map(|c| c.dom_id()).unwrap_or_default();
            let outcome = app.board.drop_on(target);
            report_transition(app, &outcome);
            app.select_card(&press.element_id);
            app.clamp_cursors();
        }
        MouseEventKind::ScrollDown => scroll(app, 1),
        MouseEventKind::ScrollUp => scroll(app, -1),
        _ => {}
    }
}

fn scroll(app: &mut App, delta: isize) {
    if app.mode != Mode::Navigate {
        return;
    }
    let count = app.visible_cards(app.focused_column_id()).len();
    let cursor = &mut app.card_cursor[app.focused_column];
    *cursor = (*cursor as isize + delta).clamp(0, count.saturating_sub(1) as isize) as usize;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use crate::model::{Status, TaskId};
    use crate::tui::render::test_helpers::{SAMPLE_TASKS, app_with_tasks, draw};

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn card_center(app: &App, element_id: &str) -> (u16, u16) {
        let (rect, _) = app
            .hit_map
            .iter()
            .find(|(_, t)| *t == HitTarget::Card(element_id.into()))
            .unwrap();
        (rect.x + rect.width / 2, rect.y + 1)
    }

    fn column_center(app: &App, status: Status) -> (u16, u16) {
        let (rect, _) = app
            .hit_map
            .iter()
            .find(|(_, t)| *t == HitTarget::Column(status.column()))
            .unwrap();
        (rect.x + rect.width / 2, rect.y + rect.height - 2)
    }

    #[test]
    fn drag_card_to_done_column() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        draw(&mut app, 120, 30);

        let (cx, cy) = card_center(&app, "task-1");
        let (dx, dy) = column_center(&app, Status::Done);

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), cx, cy));
        assert_eq!(app.board.dragging(), Some("task-1"));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), dx, dy));
        assert!(app.board.view().column(Status::Done.column()).drag_over);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), dx, dy));

        assert_eq!(app.board.task(&TaskId::new("1")).unwrap().status, Status::Done);
        assert_eq!(app.focused_column, Status::Done.index());
        assert!(!app.board.view().column(Status::Done.column()).drag_over);
    }

    #[test]
    fn click_opens_detail() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        draw(&mut app, 120, 30);
        let (cx, cy) = card_center(&app, "task-3");

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), cx, cy));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), cx, cy));

        assert_eq!(app.mode, Mode::Detail);
        assert_eq!(app.detail.as_ref().unwrap().task_id, TaskId::new("3"));
        assert!(app.board.dragging().is_none());
    }

    #[test]
    fn release_outside_columns_is_a_no_op() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        draw(&mut app, 120, 30);
        let (cx, cy) = card_center(&app, "task-1");

        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), cx, cy));
        // status row, outside every column
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 29));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 29));

        assert_eq!(app.board.task(&TaskId::new("1")).unwrap().status, Status::Todo);
        assert!(app.board.dragging().is_none());
    }
}
