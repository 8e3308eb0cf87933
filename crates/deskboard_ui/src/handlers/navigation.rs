use crossterm::event::KeyCode;

use crate::widgets::table::GridViewState;

/// Row and column movement inside a data grid
pub struct GridNavigation;

impl GridNavigation {
    /// Apply a movement key to `state` for a grid of `rows` x `columns`.
    /// Returns whether the key was a movement key.
    pub fn handle(
        state: &mut GridViewState,
        key: KeyCode,
        rows: usize,
        columns: usize,
    ) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                state.table.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.table.select_previous();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if state.table.selected_column().is_none() {
                    state.table.select_column(columns.checked_sub(1));
                } else {
                    state.table.select_previous_column();
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if state.table.selected_column().is_none() {
                    state.table.select_column(Some(0));
                } else {
                    state.table.select_next_column();
                }
            }
            KeyCode::Char('g') => {
                state.table.select(Some(0));
                state.column_offset = 0;
            }
            KeyCode::Char('G') => {
                state.table.select(rows.checked_sub(1));
            }
            _ => return false,
        }
        state.clamp(rows, columns);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_clamped() {
        let mut state = GridViewState::new();
        for _ in 0..5 {
            GridNavigation::handle(&mut state, KeyCode::Char('j'), 3, 2);
        }
        assert_eq!(state.selected(), Some(2));

        GridNavigation::handle(&mut state, KeyCode::Char('g'), 3, 2);
        assert_eq!(state.selected(), Some(0));
        GridNavigation::handle(&mut state, KeyCode::Char('k'), 3, 2);
        assert_eq!(state.selected(), Some(0));
        GridNavigation::handle(&mut state, KeyCode::Char('G'), 3, 2);
        assert_eq!(state.selected(), Some(2));
    }

    #[test]
    fn test_column_selection_starts_from_edges() {
        let mut state = GridViewState::new();
        GridNavigation::handle(&mut state, KeyCode::Char('h'), 3, 4);
        assert_eq!(state.selected_column(), Some(3));

        let mut state = GridViewState::new();
        GridNavigation::handle(&mut state, KeyCode::Char('l'), 3, 4);
        GridNavigation::handle(&mut state, KeyCode::Char('l'), 3, 4);
        assert_eq!(state.selected_column(), Some(1));
        for _ in 0..6 {
            GridNavigation::handle(&mut state, KeyCode::Right, 3, 4);
        }
        assert_eq!(state.selected_column(), Some(3));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut state = GridViewState::new();
        assert!(!GridNavigation::handle(&mut state, KeyCode::Char('x'), 3, 2));
    }
}
