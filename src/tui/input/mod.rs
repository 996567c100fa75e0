mod confirm;
mod detail;
mod grab;
mod mouse;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use confirm::handle_confirm;
use detail::handle_detail;
use grab::handle_grab;
use navigate::handle_navigate;
use search::handle_search;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Grab => handle_grab(app, key),
        Mode::Detail => handle_detail(app, key),
        Mode::ConfirmDelete => handle_confirm(app, key),
    }
}
