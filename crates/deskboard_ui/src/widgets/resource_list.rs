use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{
        Block, BorderType, Borders, List, ListItem, ListState, StatefulWidget,
        Widget,
    },
};

/// Sidebar listing the resources that can be browsed
pub struct ResourceList<'a> {
    pub titles: &'a [&'a str],
    pub active: usize,
}

impl Widget for ResourceList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items = self
            .titles
            .iter()
            .map(|title| ListItem::new(*title))
            .collect::<Vec<_>>();

        let list = List::new(items)
            .block(
                Block::new()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Resources "),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(Some(self.active));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_resource_is_marked() {
        let titles = ["Users", "Banners", "Heroes"];
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 5));
        ResourceList {
            titles: &titles,
            active: 1,
        }
        .render(buf.area, &mut buf);

        let row = (0..buf.area.width)
            .filter_map(|x| buf.cell((x, 2)))
            .map(ratatui::buffer::Cell::symbol)
            .collect::<String>();
        assert!(row.contains("▶ Banners"));
    }
}
