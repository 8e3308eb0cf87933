use ratatui::{
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
};

use super::hotkey::Hotkey;

const COLUMN_WIDTH: u16 = 22;

/// Hotkeys laid out top to bottom, then left to right
pub struct HotkeyView<'a> {
    pub hotkeys: &'a [Hotkey<'a>],
}

impl Widget for HotkeyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let mut x = area.x;
        let mut y = area.y;
        let right = area.x.saturating_add(area.width);
        let bottom = area.y.saturating_add(area.height);

        for hotkey in self.hotkeys {
            if y >= bottom {
                x = x.saturating_add(COLUMN_WIDTH);
                y = area.y;
            }
            if x >= right {
                break;
            }

            let width = COLUMN_WIDTH.min(right - x);
            Line::from(vec![
                Span::styled(
                    format!("<{}> ", hotkey.keys),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(hotkey.description),
            ])
            .render(Rect::new(x, y, width, 1), buf);

            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotkeys_wrap_into_columns() {
        let hotkeys = [
            Hotkey { keys: "n", description: "New" },
            Hotkey { keys: "r", description: "Reload" },
            Hotkey { keys: "q", description: "Quit" },
        ];
        let mut buf = Buffer::empty(Rect::new(0, 0, 44, 2));
        HotkeyView { hotkeys: &hotkeys }.render(buf.area, &mut buf);

        let line = |y: u16| {
            (0..buf.area.width)
                .filter_map(|x| buf.cell((x, y)))
                .map(ratatui::buffer::Cell::symbol)
                .collect::<String>()
        };
        assert!(line(0).starts_with("<n> New"));
        assert!(line(0).contains("<q> Quit"));
        assert!(line(1).starts_with("<r> Reload"));
    }
}
