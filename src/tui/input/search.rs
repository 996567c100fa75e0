use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

/// Search prompt. The filter is applied on every keystroke; Enter keeps it,
/// Esc restores the one that was active before.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let previous = std::mem::take(&mut app.search_before);
            app.board.set_filter(&previous);
            app.search_input.clear();
            app.mode = Mode::Navigate;
            app.clamp_cursors();
        }
        KeyCode::Enter => {
            let matched = app.board.set_filter(&app.search_input.clone());
            app.search_input.clear();
            app.search_before.clear();
            app.mode = Mode::Navigate;
            app.clamp_cursors();
            if !matched {
                app.set_status("No results found");
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            live_filter(app);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            live_filter(app);
        }
        _ => {}
    }
}

fn live_filter(app: &mut App) {
    let term = app.search_input.clone();
    app.board.set_filter(&term);
    app.clamp_cursors();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{SAMPLE_TASKS, app_with_tasks, key};

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_search(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_filters_live() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.mode = Mode::Search;
        type_str(&mut app, "login");
        assert_eq!(app.board.view().visible_card_count(), 1);
        assert!(!app.board.view().no_results_visible);

        type_str(&mut app, "zzz");
        assert_eq!(app.board.view().visible_card_count(), 0);
        assert!(app.board.view().no_results_visible);
    }

    #[test]
    fn esc_restores_previous_filter() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.mode = Mode::Search;
        type_str(&mut app, "deploy");
        handle_search(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.board.filter(), "");
        assert_eq!(app.board.view().visible_card_count(), 4);
    }

    #[test]
    fn enter_keeps_filter() {
        let mut app = app_with_tasks(SAMPLE_TASKS);
        app.mode = Mode::Search;
        type_str(&mut app, "xyz-no-match");
        handle_search(&mut app, key(KeyCode::Enter));
        assert_eq!(app.board.filter(), "xyz-no-match");
        assert!(app.board.view().no_results_visible);
        assert_eq!(app.status_message.as_ref().unwrap().text, "No results found");
    }
}
