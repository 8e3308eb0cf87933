use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
};

/// A centered row of buttons, one of them highlighted
pub struct Buttons<'a> {
    pub buttons: &'a [&'a str],
    pub selected: usize,
}

impl Widget for Buttons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(self.buttons.len() * 2);
        for (index, label) in self.buttons.iter().enumerate() {
            let background = if index == self.selected {
                Color::Blue
            } else {
                Color::DarkGray
            };
            spans.push(Span::styled(
                format!(" {label} "),
                Style::default().fg(Color::White).bg(background),
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans).centered().render(area, buf);
    }
}
