use deskboard_api::{SortState, TableRecord};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, HighlightSpacing, Paragraph, Row, StatefulWidget, Table,
        TableState, Widget,
    },
};

use crate::widgets::{
    column::ColumnSet, constraint_len_calculator, sort_toggle::SortToggle,
};

pub const DEFAULT_NO_DATA_TEXT: &str = "No data";
pub const DEFAULT_SKELETON_ROWS: usize = 5;
pub const ACTIONS_HEADER: &str = "Actions";

const PLACEHOLDER_CELL: &str = "░░░░░░";
const PLACEHOLDER_SLOT: &str = "◌";
const HIGHLIGHT_BAR: &str = " █ ";

/// Row-level operations a grid can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

impl RowAction {
    pub const ALL: [Self; 3] = [Self::View, Self::Edit, Self::Delete];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    /// Informational, neutral and destructive, in that order
    #[must_use]
    pub fn style(self) -> Style {
        match self {
            Self::View => Style::default().fg(Color::Blue),
            Self::Edit => Style::default().fg(Color::Gray),
            Self::Delete => Style::default().fg(Color::Red),
        }
    }
}

/// Which action slots a grid shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSlots {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl ActionSlots {
    pub const NONE: Self = Self {
        view: false,
        edit: false,
        delete: false,
    };

    #[must_use]
    pub const fn any(self) -> bool {
        self.view || self.edit || self.delete
    }

    #[must_use]
    pub const fn contains(self, action: RowAction) -> bool {
        match action {
            RowAction::View => self.view,
            RowAction::Edit => self.edit,
            RowAction::Delete => self.delete,
        }
    }

    pub fn iter(self) -> impl Iterator<Item = RowAction> {
        RowAction::ALL
            .into_iter()
            .filter(move |action| self.contains(*action))
    }

    /// Width of the action cell: labels separated by single spaces
    #[must_use]
    pub fn cell_width(self) -> u16 {
        let labels = self.iter().map(|a| a.label().len()).sum::<usize>();
        let gaps = self.iter().count().saturating_sub(1);
        u16::try_from(labels + gaps).unwrap_or(u16::MAX)
    }
}

type ActionCallback<'a, R> = Box<dyn FnMut(&R) + 'a>;

/// Caller-supplied row action callbacks. A slot is shown only for the
/// callbacks that are set.
pub struct RowActions<'a, R> {
    on_view: Option<ActionCallback<'a, R>>,
    on_edit: Option<ActionCallback<'a, R>>,
    on_delete: Option<ActionCallback<'a, R>>,
}

impl<R> Default for RowActions<'_, R> {
    fn default() -> Self {
        Self {
            on_view: None,
            on_edit: None,
            on_delete: None,
        }
    }
}

impl<'a, R> RowActions<'a, R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_view(mut self, callback: impl FnMut(&R) + 'a) -> Self {
        self.on_view = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_edit(mut self, callback: impl FnMut(&R) + 'a) -> Self {
        self.on_edit = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_delete(mut self, callback: impl FnMut(&R) + 'a) -> Self {
        self.on_delete = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub const fn slots(&self) -> ActionSlots {
        ActionSlots {
            view: self.on_view.is_some(),
            edit: self.on_edit.is_some(),
            delete: self.on_delete.is_some(),
        }
    }

    /// Call the callback for `action` once with `record`. Returns false when
    /// that slot has no callback.
    pub fn invoke(&mut self, action: RowAction, record: &R) -> bool {
        let callback = match action {
            RowAction::View => self.on_view.as_mut(),
            RowAction::Edit => self.on_edit.as_mut(),
            RowAction::Delete => self.on_delete.as_mut(),
        };
        if let Some(callback) = callback {
            callback(record);
            true
        } else {
            false
        }
    }
}

/// Stable key of a rendered row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub key: RowKey,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridBody {
    /// Placeholder rows shown while a fetch is in flight
    Loading { rows: usize },
    /// A single message row spanning every column
    Empty { text: String, span: usize },
    Rows(Vec<GridRow>),
}

/// What the grid will draw, independent of any terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub header: Vec<String>,
    pub actions: ActionSlots,
    pub body: GridBody,
}

impl GridLayout {
    #[must_use]
    pub fn row_count(&self) -> usize {
        match &self.body {
            GridBody::Loading { rows } => *rows,
            GridBody::Empty { .. } => 1,
            GridBody::Rows(rows) => rows.len(),
        }
    }
}

/// Selection and horizontal scroll of a grid
#[derive(Debug, Clone, Default)]
pub struct GridViewState {
    pub table: TableState,
    pub column_offset: usize,
}

impl GridViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: TableState::default().with_selected(0),
            column_offset: 0,
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    #[must_use]
    pub fn selected_column(&self) -> Option<usize> {
        self.table.selected_column()
    }

    #[must_use]
    pub fn selected_record<'r, R>(&self, records: &'r [R]) -> Option<&'r R> {
        self.selected().and_then(|index| records.get(index))
    }

    /// Keep the selection inside `rows` x `columns`, selecting the first row
    /// when there is one and nothing is selected
    pub fn clamp(&mut self, rows: usize, columns: usize) {
        if rows == 0 {
            self.table.select(None);
        } else {
            let row = self.table.selected().map_or(0, |row| row.min(rows - 1));
            self.table.select(Some(row));
        }

        if let Some(column) = self.table.selected_column()
            && column >= columns
        {
            self.table.select_column(columns.checked_sub(1));
        }

        self.column_offset = self.column_offset.min(columns.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.table.select(Some(0));
        self.table.select_column(None);
        self.column_offset = 0;
    }
}

/// Record table with sortable headers, row actions, and loading and empty
/// states
pub struct DataGrid<'a, R> {
    columns: &'a ColumnSet<R>,
    records: &'a [R],
    no_data_text: &'a str,
    is_loading: bool,
    skeleton_rows: usize,
    actions: ActionSlots,
    sort: Option<&'a SortState>,
    block: Option<Block<'a>>,
}

impl<'a, R: TableRecord> DataGrid<'a, R> {
    #[must_use]
    pub const fn new(columns: &'a ColumnSet<R>, records: &'a [R]) -> Self {
        Self {
            columns,
            records,
            no_data_text: DEFAULT_NO_DATA_TEXT,
            is_loading: false,
            skeleton_rows: DEFAULT_SKELETON_ROWS,
            actions: ActionSlots::NONE,
            sort: None,
            block: None,
        }
    }

    #[must_use]
    pub const fn no_data_text(mut self, text: &'a str) -> Self {
        self.no_data_text = text;
        self
    }

    #[must_use]
    pub const fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    #[must_use]
    pub const fn skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = rows;
        self
    }

    #[must_use]
    pub const fn actions(mut self, actions: ActionSlots) -> Self {
        self.actions = actions;
        self
    }

    /// Show the action slots of whichever callbacks `actions` carries
    #[must_use]
    pub const fn row_actions(self, actions: &RowActions<'_, R>) -> Self {
        self.actions(actions.slots())
    }

    #[must_use]
    pub const fn sort(mut self, sort: &'a SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn header_label(&self, index: usize) -> String {
        let Some(column) = self.columns.get(index) else {
            return String::new();
        };
        match self.sort {
            Some(sort) if column.is_sortable() => format!(
                "{} {}",
                column.label(),
                SortToggle::new(column.key(), sort).indicator().glyph()
            ),
            Some(_) | None => column.label().to_string(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> GridLayout {
        let mut header = (0..self.columns.len())
            .map(|index| self.header_label(index))
            .collect::<Vec<_>>();
        if self.actions.any() {
            header.push(ACTIONS_HEADER.to_string());
        }

        let body = if self.is_loading {
            GridBody::Loading {
                rows: self.skeleton_rows,
            }
        } else if self.records.is_empty() {
            GridBody::Empty {
                text: self.no_data_text.to_string(),
                span: self.columns.len() + usize::from(self.actions.any()),
            }
        } else {
            GridBody::Rows(
                self.records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| GridRow {
                        key: record
                            .row_id()
                            .map_or(RowKey::Index(index), |id| {
                                RowKey::Id(id.into_owned())
                            }),
                        cells: self.columns.resolve_row(record),
                    })
                    .collect(),
            )
        };

        GridLayout {
            header,
            actions: self.actions,
            body,
        }
    }

    /// Content widths of the data columns, overridden by explicit hints
    fn column_widths(&self, layout: &GridLayout) -> Vec<u16> {
        let header = layout
            .header
            .iter()
            .take(self.columns.len())
            .cloned()
            .collect::<Vec<_>>();
        let mut widths = match &layout.body {
            GridBody::Rows(rows) => {
                let cells =
                    rows.iter().map(|row| row.cells.clone()).collect::<Vec<_>>();
                constraint_len_calculator(&header, &cells)
            }
            GridBody::Loading { .. } | GridBody::Empty { .. } => {
                constraint_len_calculator(&header, &[])
            }
        };
        for (width, column) in widths.iter_mut().zip(self.columns.iter()) {
            if let Some(hint) = column.width_hint() {
                *width = match hint {
                    Constraint::Length(n)
                    | Constraint::Min(n)
                    | Constraint::Max(n) => n,
                    Constraint::Percentage(_)
                    | Constraint::Ratio(_, _)
                    | Constraint::Fill(_) => *width,
                };
            }
        }
        widths
    }

    fn constraint(&self, index: usize, width: u16) -> Constraint {
        self.columns
            .get(index)
            .and_then(|column| column.width_hint())
            .unwrap_or(Constraint::Length(width.saturating_add(1)))
    }
}

/// Columns that fit in `available` starting from an offset that keeps the
/// selected column on screen. Returns the visible indices and that offset.
fn visible_columns(
    widths: &[u16],
    offset: usize,
    selected: Option<usize>,
    available: u16,
) -> (Vec<usize>, usize) {
    let Some(last) = widths.len().checked_sub(1) else {
        return (Vec::new(), 0);
    };
    let mut offset = offset.min(last);

    if let Some(selected) = selected.map(|column| column.min(last)) {
        if selected < offset {
            offset = selected;
        } else {
            let needed = widths
                .iter()
                .skip(offset)
                .take(selected - offset + 1)
                .map(|w| w.saturating_add(1))
                .fold(0u16, u16::saturating_add);
            if needed > available {
                offset = selected;
            }
        }
    }

    let mut used = 0u16;
    let mut visible = Vec::new();
    for (index, width) in widths.iter().enumerate().skip(offset) {
        let width = width.saturating_add(1);
        if used.saturating_add(width) > available && !visible.is_empty() {
            break;
        }
        used = used.saturating_add(width);
        visible.push(index);
    }
    (visible, offset)
}

fn create_table_styles() -> (Style, Style, Style, Text<'static>, HighlightSpacing)
{
    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        .fg(Color::Black)
        .bg(Color::Yellow);
    let selected_col_style = Style::default().fg(Color::Cyan);
    let selected_cell_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .fg(Color::Magenta);
    (
        selected_row_style,
        selected_col_style,
        selected_cell_style,
        Text::from(HIGHLIGHT_BAR),
        HighlightSpacing::Always,
    )
}

fn action_cell(actions: ActionSlots) -> Cell<'static> {
    let mut spans = Vec::new();
    for action in actions.iter() {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(action.label(), action.style()));
    }
    Cell::from(Line::from(spans))
}

fn placeholder_action_cell() -> Cell<'static> {
    let slots = [PLACEHOLDER_SLOT; 3].join(" ");
    Cell::from(Span::styled(slots, Style::default().fg(Color::DarkGray)))
}

impl<R: TableRecord> StatefulWidget for DataGrid<'_, R> {
    type State = GridViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let layout = self.layout();
        let widths = self.column_widths(&layout);

        let has_actions = layout.actions.any();
        let actions_width = if has_actions {
            layout
                .actions
                .cell_width()
                .max(u16::try_from(ACTIONS_HEADER.len()).unwrap_or(u16::MAX))
        } else {
            0
        };
        let bar_width = u16::try_from(HIGHLIGHT_BAR.chars().count()).unwrap_or(0);
        let available = inner
            .width
            .saturating_sub(actions_width.saturating_add(1))
            .saturating_sub(bar_width);

        let selected_column = state.table.selected_column();
        let (visible, offset) =
            visible_columns(&widths, state.column_offset, selected_column, available);
        state.column_offset = offset;

        let pick = |cells: &[String]| -> Vec<Cell<'static>> {
            visible
                .iter()
                .map(|&index| Cell::from(cells.get(index).cloned().unwrap_or_default()))
                .collect()
        };

        let mut header_cells = pick(&layout.header);
        if has_actions {
            header_cells.push(Cell::from(ACTIONS_HEADER));
        }
        let header = Row::new(header_cells)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);

        let mut constraints = visible
            .iter()
            .map(|&index| {
                self.constraint(index, widths.get(index).copied().unwrap_or(0))
            })
            .collect::<Vec<_>>();
        if has_actions {
            constraints.push(Constraint::Length(actions_width));
        }

        let (
            selected_row_style,
            selected_col_style,
            selected_cell_style,
            highlight_symbol,
            highlight_spacing,
        ) = create_table_styles();

        match layout.body {
            GridBody::Loading { rows } => {
                let placeholder = (0..rows).map(|_| {
                    let mut cells = visible
                        .iter()
                        .map(|_| Cell::from(PLACEHOLDER_CELL.dark_gray()))
                        .collect::<Vec<_>>();
                    if has_actions {
                        cells.push(placeholder_action_cell());
                    }
                    Row::new(cells).height(1)
                });
                let table = Table::new(placeholder, constraints)
                    .header(header)
                    .highlight_spacing(highlight_spacing);
                StatefulWidget::render(table, inner, buf, &mut TableState::default());
            }
            GridBody::Empty { text, .. } => {
                let table = Table::new(Vec::<Row>::new(), constraints)
                    .header(header)
                    .highlight_spacing(highlight_spacing);
                StatefulWidget::render(table, inner, buf, &mut TableState::default());

                let message_area = Rect {
                    y: inner.y.saturating_add(1),
                    height: inner.height.saturating_sub(1).min(1),
                    ..inner
                };
                Paragraph::new(text.dark_gray())
                    .alignment(Alignment::Center)
                    .render(message_area, buf);
            }
            GridBody::Rows(rows) => {
                let body = rows.iter().map(|row| {
                    let mut cells = pick(&row.cells);
                    if has_actions {
                        cells.push(action_cell(layout.actions));
                    }
                    Row::new(cells).height(1)
                });
                let table = Table::new(body, constraints)
                    .header(header)
                    .row_highlight_style(selected_row_style)
                    .column_highlight_style(selected_col_style)
                    .cell_highlight_style(selected_cell_style)
                    .highlight_symbol(highlight_symbol)
                    .highlight_spacing(highlight_spacing);

                let relative_column = selected_column
                    .and_then(|column| visible.iter().position(|&i| i == column));
                state.table.select_column(relative_column);
                StatefulWidget::render(table, inner, buf, &mut state.table);
                state.table.select_column(selected_column);
            }
        }
    }
}
