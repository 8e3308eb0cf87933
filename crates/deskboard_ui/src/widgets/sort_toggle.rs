use deskboard_api::{QueryState, SortOrder, SortState};

/// Receives the events a sort toggle emits
pub trait SortHandler {
    fn on_sort_field_change(&mut self, field: &str);
    fn on_sort_order_change(&mut self, order: SortOrder);
}

impl SortHandler for QueryState {
    fn on_sort_field_change(&mut self, field: &str) {
        self.set_sort_field(field);
    }

    fn on_sort_order_change(&mut self, order: SortOrder) {
        self.set_sort_order(order);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unset,
    Ascending,
    Descending,
}

impl SortIndicator {
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Unset => "⇵",
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Tri-state sort control bound to one column key
#[derive(Debug, Clone, Copy)]
pub struct SortToggle<'a> {
    field: &'a str,
    sort: &'a SortState,
}

impl<'a> SortToggle<'a> {
    #[must_use]
    pub const fn new(field: &'a str, sort: &'a SortState) -> Self {
        Self { field, sort }
    }

    #[must_use]
    pub fn indicator(&self) -> SortIndicator {
        if !self.sort.is_active(self.field) {
            return SortIndicator::Unset;
        }
        match self.sort.order {
            SortOrder::Asc => SortIndicator::Ascending,
            SortOrder::Desc => SortIndicator::Descending,
        }
    }

    /// An inactive column takes over the sort, newest first. An active one
    /// flips its direction.
    pub fn activate(&self, handler: &mut impl SortHandler) {
        if self.sort.is_active(self.field) {
            handler.on_sort_order_change(self.sort.order.flipped());
        } else {
            handler.on_sort_field_change(self.field);
            handler.on_sort_order_change(SortOrder::Desc);
        }
    }
}
