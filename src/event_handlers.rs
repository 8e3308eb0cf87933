use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use deskboard_api::QueryState;
use deskboard_ui::{GridNavigation, Pager, RowAction, handle_search_input};

use crate::{app::App, app_state::Focus};

/// How long to wait for input before going back to service events
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const fn is_interrupt(key: KeyEvent) -> bool {
    matches!(
        (key.modifiers, key.code),
        (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C'))
    )
}

impl App {
    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Polls with a short timeout so background results are applied even
    /// while no keys are pressed.
    pub fn handle_crossterm_events(&mut self) -> Result<()> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.on_key_event(key);
            }
            Event::Key(_) // Ignore non-press key events
            | Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_)
            | Event::Paste(_)
            | Event::Resize(_, _) => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        if self.modal_manager.is_open() {
            let action = self.modal_manager.handle_key_event(key);
            self.on_modal_action(action);
            return;
        }

        if self.focus == Focus::Search {
            self.on_search_key(key);
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c' | 'C'))
            | (_, KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::Tab) => self.next_page(),
            (_, KeyCode::BackTab) => self.previous_page(),
            (_, KeyCode::Char('/')) => {
                self.search_box.activate();
                self.focus = Focus::Search;
            }
            (_, KeyCode::Char('s')) => self.sort_selected_column(),
            (_, KeyCode::Char('[')) => {
                self.update_active_query(|pager, query| pager.previous(query));
            }
            (_, KeyCode::Char(']')) => {
                self.update_active_query(|pager, query| pager.next(query));
            }
            (_, KeyCode::Home) => {
                self.update_active_query(|pager, query| pager.first(query));
            }
            (_, KeyCode::End) => {
                self.update_active_query(|pager, query| pager.last(query));
            }
            (_, KeyCode::Char('+' | '=')) => {
                self.update_active_query(|pager, query| pager.next_limit(query));
            }
            (_, KeyCode::Char('-')) => {
                self.update_active_query(|pager, query| {
                    pager.previous_limit(query)
                });
            }
            (_, KeyCode::Char('v')) => self.activate_row(RowAction::View),
            (_, KeyCode::Char('e')) => self.activate_row(RowAction::Edit),
            (_, KeyCode::Char('d')) => self.activate_row(RowAction::Delete),
            (_, KeyCode::Char('n')) => self.open_new_form(),
            (_, KeyCode::Char('r')) => self.reload(),
            (_, code) => {
                if let Some(page) = self.pages.get_mut(self.active) {
                    let rows = page.records.len();
                    let columns = page.resource.columns.len();
                    GridNavigation::handle(&mut page.grid, code, rows, columns);
                }
            }
        }
    }

    fn update_active_query(
        &mut self,
        f: impl FnOnce(Pager<'_>, &mut QueryState) -> bool,
    ) {
        if let Some(page) = self.pages.get_mut(self.active) {
            page.update_query(f);
        }
    }

    /// Keys while the search box has focus; every edit re-queries
    fn on_search_key(&mut self, key: KeyEvent) {
        let Some(page) = self.pages.get_mut(self.active) else {
            return;
        };
        let search_box = &mut self.search_box;
        let consumed =
            page.update_query(|_, query| handle_search_input(key, search_box, query));

        if !consumed && is_interrupt(key) {
            self.quit();
        }
        if !self.search_box.is_active {
            self.focus = Focus::Grid;
        }
    }
}
