use std::fmt::Display;

/// A key binding shown in the top bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey<'a> {
    pub keys: &'a str,
    pub description: &'a str,
}

impl Display for Hotkey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", self.keys, self.description)
    }
}
