/// Single-line text buffer with a cursor counted in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `text`, cursor at the end
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(index, _)| index)
    }

    /// Text left and right of the cursor
    #[must_use]
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.text.split_at(self.byte_index(self.cursor))
    }

    pub fn add_char(&mut self, ch: char) {
        let index = self.byte_index(self.cursor);
        self.text.insert(index, ch);
        self.cursor += 1;
    }

    /// Backspace. Returns whether anything was removed.
    pub fn delete_char(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let index = self.byte_index(self.cursor);
        self.text.remove(index);
        true
    }

    pub const fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub const fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_char() {
        let mut input = TextInput::new();
        input.add_char('a');
        assert_eq!(input.text(), "a");
        assert_eq!(input.cursor_position(), 1);
    }

    #[test]
    fn test_delete_char() {
        let mut input = TextInput::with_text("hello");
        assert!(input.delete_char());
        assert_eq!(input.text(), "hell");
        assert_eq!(input.cursor_position(), 4);

        input.move_cursor_to_start();
        assert!(!input.delete_char());
        assert_eq!(input.text(), "hell");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_text("café");
        input.move_cursor_left();
        input.add_char('f');
        assert_eq!(input.text(), "caffé");
        assert_eq!(input.split_at_cursor(), ("caff", "é"));

        input.move_cursor_to_end();
        assert!(input.delete_char());
        assert_eq!(input.text(), "caff");
    }

    #[test]
    fn test_cursor_movement_is_bounded() {
        let mut input = TextInput::with_text("hi");
        input.move_cursor_right();
        assert_eq!(input.cursor_position(), 2);
        input.move_cursor_to_start();
        input.move_cursor_left();
        assert_eq!(input.cursor_position(), 0);
    }
}
