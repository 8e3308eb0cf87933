use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Paragraph, Widget, Wrap},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Info,
    Error,
}

/// One-line message bar at the bottom of the screen
#[derive(Clone, Debug, Default)]
pub struct StatusLine {
    message: String,
    kind: StatusKind,
}

impl StatusLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            kind: StatusKind::Info,
        }
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.kind = StatusKind::Info;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.kind = StatusKind::Error;
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.kind = StatusKind::Info;
    }
}

impl Widget for &StatusLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let style = match self.kind {
            StatusKind::Info => Style::default(),
            StatusKind::Error => Style::default().fg(Color::Red),
        };

        Paragraph::new(self.message.as_str())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_then_clear() {
        let mut status = StatusLine::new();
        status.set_error("Could not load users");
        assert_eq!(status.kind(), StatusKind::Error);
        status.clear();
        assert_eq!(status.message(), "");
        assert_eq!(status.kind(), StatusKind::Info);
    }

    #[test]
    fn test_render_message() {
        let mut status = StatusLine::new();
        status.set_info("Saved");
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        (&status).render(buf.area, &mut buf);
        assert_eq!(buf.cell((0, 0)).map(ratatui::buffer::Cell::symbol), Some("S"));
    }
}
