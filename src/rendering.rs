use deskboard_ui::{DataGrid, Pager, ResourceList, TopBarView};
use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, BorderType, Borders},
};

use crate::app::{APP_NAME, App, SIDEBAR_WIDTH, TOPBAR_HEIGHT};

const SEARCH_HEIGHT: u16 = 3;

impl App {
    /// Renders the user interface.
    ///
    /// Top bar, resource sidebar, then the active listing: search box, grid
    /// and pager. The status line takes the last row and modals draw over
    /// everything.
    pub fn render(&mut self, frame: &mut Frame) {
        let [top, body, status] = Layout::vertical([
            Constraint::Length(TOPBAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let titles = self
            .pages
            .iter()
            .map(|page| page.resource.title)
            .collect::<Vec<_>>();

        let [sidebar, main] = Layout::horizontal([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Min(0),
        ])
        .areas(body);
        frame.render_widget(
            ResourceList {
                titles: &titles,
                active: self.active,
            },
            sidebar,
        );

        if let Some(page) = self.pages.get_mut(self.active) {
            frame.render_widget(
                TopBarView {
                    title: page.resource.title,
                    summary: page.summary(),
                    hotkeys: self.hotkeys,
                    app_name: APP_NAME,
                },
                top,
            );

            let [search, grid, pager] = Layout::vertical([
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(main);

            frame.render_widget(&self.search_box, search);

            let block = Block::new()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!(" {} ", page.resource.title))
                .title_alignment(Alignment::Center);
            let table = DataGrid::new(&page.resource.columns, &page.records)
                .no_data_text(page.resource.no_data_text)
                .loading(page.is_loading)
                .skeleton_rows(self.skeleton_rows)
                .row_actions(&page.row_actions(&self.row_requests))
                .sort(page.query.sort())
                .block(block);
            frame.render_stateful_widget(table, grid, &mut page.grid);

            frame.render_widget(
                Pager::from_query(&page.query).limits(page.limits()),
                pager,
            );
        }

        frame.render_widget(&self.status_line, status);
        frame.render_widget(&self.modal_manager, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::tests::{demo_app, settle};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_loaded_page_renders_rows_and_pager() {
        let mut app = demo_app();
        settle(&mut app).await;

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text = screen(&terminal);

        assert!(text.contains("Resources"));
        assert!(text.contains("Notifications"));
        assert!(text.contains("Page 1 of 5"));
        assert!(text.contains("Actions"));
        assert!(text.contains("Search (/)"));
    }

    #[test]
    fn test_loading_page_shows_placeholders() {
        let mut app = demo_app();
        if let Some(page) = app.pages.first_mut() {
            page.begin_fetch();
        }

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert!(screen(&terminal).contains("░░░░░░"));
    }

    #[test]
    fn test_modal_draws_over_the_grid() {
        let mut app = demo_app();
        app.open_new_form();

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert!(screen(&terminal).contains("New User"));
    }
}
