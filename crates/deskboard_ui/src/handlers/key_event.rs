use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::widgets::{
    search_box::{SearchBox, SearchHandler},
    text_input::TextInput,
};

/// Keys shared by every single-line input. Control chords are matched before
/// plain characters so that Ctrl-a never types an `a`.
macro_rules! handle_text_input {
    ($key:expr, $widget:expr, insert($ch:ident) => $insert:block, delete => $delete:block, clear => $clear:block) => {{
        match ($key.modifiers, $key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                $widget.move_cursor_to_start();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                $widget.move_cursor_to_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                $clear;
                true
            }
            (KeyModifiers::CONTROL, _) => false,
            (_, KeyCode::Char($ch)) if !$ch.is_control() => {
                $insert;
                true
            }
            (_, KeyCode::Backspace) => {
                $delete;
                true
            }
            (_, KeyCode::Left) => {
                $widget.move_cursor_left();
                true
            }
            (_, KeyCode::Right) => {
                $widget.move_cursor_right();
                true
            }
            (_, KeyCode::Home) => {
                $widget.move_cursor_to_start();
                true
            }
            (_, KeyCode::End) => {
                $widget.move_cursor_to_end();
                true
            }
            _ => false,
        }
    }};
}

/// Keys while the search box has focus. Esc and Enter leave the box and keep
/// the text. Returns whether the key was consumed.
pub fn handle_search_input(
    key: KeyEvent,
    search: &mut SearchBox,
    handler: &mut impl SearchHandler,
) -> bool {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
        search.deactivate();
        return true;
    }
    handle_text_input!(
        key,
        search,
        insert(ch) => { search.insert_char(ch, handler); },
        delete => { search.delete_char(handler); },
        clear => { search.clear(handler); }
    )
}

/// Editing keys for one form field. Returns whether the key was consumed.
pub fn handle_form_input(key: KeyEvent, input: &mut TextInput) -> bool {
    handle_text_input!(
        key,
        input,
        insert(ch) => { input.add_char(ch); },
        delete => { input.delete_char(); },
        clear => { input.clear(); }
    )
}
