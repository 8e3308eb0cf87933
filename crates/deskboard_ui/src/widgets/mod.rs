pub mod buttons;
pub mod column;
pub mod hotkey;
pub mod hotkey_view;
pub mod modal;
pub mod pager;
pub mod resource_list;
pub mod search_box;
pub mod sort_toggle;
pub mod status_line;
pub mod table;
pub mod text_input;
pub mod top_bar_view;

pub use buttons::Buttons;
pub use column::{CellRenderer, Column, ColumnError, ColumnSet};
pub use hotkey::Hotkey;
pub use hotkey_view::HotkeyView;
pub use modal::{
    ConfirmationModal, FieldKind, FormError, FormField, ModalAction,
    ModalManager, Mode, RecordFormModal, RecordViewModal,
};
pub use pager::{PageItem, Pager, PagerHandler, page_window};
pub use resource_list::ResourceList;
pub use search_box::{SearchBox, SearchHandler};
pub use sort_toggle::{SortHandler, SortIndicator, SortToggle};
pub use status_line::{StatusKind, StatusLine};
pub use table::{
    ACTIONS_HEADER, ActionSlots, DEFAULT_NO_DATA_TEXT, DEFAULT_SKELETON_ROWS,
    DataGrid, GridBody, GridLayout, GridRow, GridViewState, RowAction,
    RowActions, RowKey,
};
pub use text_input::TextInput;
pub use top_bar_view::{LISTING_HOTKEYS, TopBarView};
use unicode_width::UnicodeWidthStr;

/// Display width of every column: the widest of the header and each line of
/// every cell below it
#[must_use]
pub fn constraint_len_calculator(header: &[String], rows: &[Vec<String>]) -> Vec<u16> {
    let mut result = header
        .iter()
        .map(|label| UnicodeWidthStr::width(label.as_str()))
        .collect::<Vec<usize>>();

    for row in rows {
        for (max_width, cell) in result.iter_mut().zip(row) {
            let width = cell
                .lines()
                .map(UnicodeWidthStr::width)
                .max()
                .unwrap_or(0);
            *max_width = (*max_width).max(width);
        }
    }

    result
        .into_iter()
        .map(|width| u16::try_from(width).unwrap_or(u16::MAX))
        .collect()
}
