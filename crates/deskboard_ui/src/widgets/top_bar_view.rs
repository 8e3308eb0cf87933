use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

use super::{hotkey::Hotkey, hotkey_view::HotkeyView};

pub const LISTING_HOTKEYS: [Hotkey; 12] = [
    Hotkey { keys: "Tab", description: "Next resource" },
    Hotkey { keys: "/", description: "Search" },
    Hotkey { keys: "s", description: "Sort column" },
    Hotkey { keys: "[ ]", description: "Prev/next page" },
    Hotkey { keys: "Home End", description: "First/last" },
    Hotkey { keys: "+ -", description: "Rows per page" },
    Hotkey { keys: "v", description: "View" },
    Hotkey { keys: "e", description: "Edit" },
    Hotkey { keys: "d", description: "Delete" },
    Hotkey { keys: "n", description: "New" },
    Hotkey { keys: "r", description: "Reload" },
    Hotkey { keys: "q", description: "Quit" },
];

/// Header bar: the current page on the left, hotkeys in the middle and the
/// application name on the right
pub struct TopBarView<'a> {
    pub title: &'a str,
    pub summary: String,
    pub hotkeys: &'a [Hotkey<'a>],
    pub app_name: &'a str,
}

impl Widget for TopBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [left, middle, right] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .spacing(1)
        .areas(area);

        Paragraph::new(vec![
            Line::styled(
                self.title,
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::from(self.summary.dark_gray()),
        ])
        .render(left, buf);
        HotkeyView {
            hotkeys: self.hotkeys,
        }
        .render(middle, buf);
        Paragraph::new(self.app_name.trim_start())
            .alignment(Alignment::Right)
            .render(right, buf);
    }
}
