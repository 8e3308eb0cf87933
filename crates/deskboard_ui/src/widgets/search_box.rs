use deskboard_api::QueryState;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::widgets::text_input::TextInput;

const DEFAULT_PLACEHOLDER: &str = "Search...";

/// Receives the text of a search box every time it changes
pub trait SearchHandler {
    fn on_search_change(&mut self, text: &str);
}

impl SearchHandler for QueryState {
    fn on_search_change(&mut self, text: &str) {
        self.set_search(text);
    }
}

/// Free-text filter above a listing. Every edit is reported straight away.
#[derive(Debug, Clone)]
pub struct SearchBox {
    input: TextInput,
    pub is_active: bool,
    placeholder: String,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            is_active: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl SearchBox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, text: &str) -> Self {
        self.input.set_text(text);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Replace the text without emitting, e.g. when switching pages
    pub fn set_value(&mut self, text: &str) {
        self.input.set_text(text);
    }

    #[must_use]
    pub fn value(&self) -> &str {
        self.input.text()
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.input.move_cursor_to_end();
    }

    /// Leave the box; the text stays and keeps filtering
    pub const fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn insert_char(&mut self, ch: char, handler: &mut impl SearchHandler) {
        self.input.add_char(ch);
        handler.on_search_change(self.input.text());
    }

    pub fn delete_char(&mut self, handler: &mut impl SearchHandler) {
        if self.input.delete_char() {
            handler.on_search_change(self.input.text());
        }
    }

    /// Empty the box and report `""`, even if it was already empty
    pub fn clear(&mut self, handler: &mut impl SearchHandler) {
        self.input.clear();
        handler.on_search_change("");
    }

    pub const fn move_cursor_left(&mut self) {
        self.input.move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.input.move_cursor_right();
    }

    pub const fn move_cursor_to_start(&mut self) {
        self.input.move_cursor_to_start();
    }

    pub fn move_cursor_to_end(&mut self) {
        self.input.move_cursor_to_end();
    }
}

impl Widget for &SearchBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border, title) = if self.is_active {
            (
                Style::default().fg(Color::Yellow),
                " Search (Esc/Enter to leave, Ctrl-u to clear) ",
            )
        } else {
            (Style::default().fg(Color::DarkGray), " Search (/) ")
        };

        let block = Block::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .title_alignment(Alignment::Left);
        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.is_active {
            let (before, after) = self.input.split_at_cursor();
            Line::from(vec![
                Span::raw(before),
                Span::styled("█", Style::default().fg(Color::White)),
                Span::raw(after),
            ])
        } else if self.input.is_empty() {
            Line::from(self.placeholder.as_str().dark_gray())
        } else {
            Line::from(self.input.text())
        };

        Paragraph::new(line).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        emitted: Vec<String>,
    }

    impl SearchHandler for Recorder {
        fn on_search_change(&mut self, text: &str) {
            self.emitted.push(text.to_string());
        }
    }

    #[test]
    fn test_each_keystroke_emits_full_text_and_clear_emits_empty() {
        let mut search = SearchBox::new();
        let mut recorder = Recorder::default();
        search.insert_char('a', &mut recorder);
        search.insert_char('b', &mut recorder);
        search.clear(&mut recorder);
        assert_eq!(recorder.emitted, vec!["a", "ab", ""]);
    }

    #[test]
    fn test_clear_emits_even_when_empty() {
        let mut search = SearchBox::new();
        let mut recorder = Recorder::default();
        search.clear(&mut recorder);
        assert_eq!(recorder.emitted, vec![""]);
    }

    #[test]
    fn test_cursor_moves_do_not_emit() {
        let mut search = SearchBox::new().with_value("abc");
        let mut recorder = Recorder::default();
        search.move_cursor_left();
        search.move_cursor_to_start();
        search.delete_char(&mut recorder);
        assert!(recorder.emitted.is_empty());

        search.move_cursor_to_end();
        search.delete_char(&mut recorder);
        assert_eq!(recorder.emitted, vec!["ab"]);
    }

    #[test]
    fn test_query_state_returns_to_first_page() {
        let mut query = QueryState::default();
        query.set_total(40);
        query.set_page(3);

        let mut search = SearchBox::new();
        search.insert_char('x', &mut query);
        assert_eq!(query.search(), "x");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_deactivate_keeps_text() {
        let mut search = SearchBox::new().with_value("ali");
        search.activate();
        search.deactivate();
        assert!(!search.is_active);
        assert_eq!(search.value(), "ali");
    }
}
