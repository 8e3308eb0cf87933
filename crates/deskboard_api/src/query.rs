use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column every listing is sorted by until the user picks another one
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Page-size menu offered by listing pages
pub const DEFAULT_LIMITS: [PageLimit; 5] =
    [limit(2), limit(5), limit(10), limit(20), limit(30)];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    #[error("page size must be at least 1")]
    ZeroLimit,
}

/// A page size; zero is unrepresentable
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageLimit(NonZeroUsize);

const fn limit(n: usize) -> PageLimit {
    match NonZeroUsize::new(n) {
        Some(n) => PageLimit(n),
        None => panic!("page size must be at least 1"),
    }
}

impl PageLimit {
    pub const DEFAULT: Self = limit(5);

    pub const fn new(n: usize) -> Result<Self, QueryError> {
        match NonZeroUsize::new(n) {
            Some(n) => Ok(Self(n)),
            None => Err(QueryError::ZeroLimit),
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for PageLimit {
    type Error = QueryError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<PageLimit> for usize {
    fn from(limit: PageLimit) -> Self {
        limit.get()
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `ceil(total / limit)`; zero records means zero pages
#[must_use]
pub const fn total_pages(total: usize, limit: PageLimit) -> usize {
    total.div_ceil(limit.get())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SortOrderError(String);

impl fmt::Display for SortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort order `{}`", self.0)
    }
}

impl std::error::Error for SortOrderError {}

impl FromStr for SortOrder {
    type Err = SortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SortOrderError(other.to_string())),
        }
    }
}

/// The active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

impl SortState {
    #[must_use]
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    #[must_use]
    pub fn is_active(&self, field: &str) -> bool {
        self.field == field
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(DEFAULT_SORT_FIELD, SortOrder::Desc)
    }
}

/// Query parameters of a listing read, in the API's wire names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: usize,
    pub limit: PageLimit,
    pub search: String,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

/// Paging, search and sort state owned by one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: usize,
    limit: PageLimit,
    total: usize,
    search: String,
    sort: SortState,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageLimit::DEFAULT)
    }
}

impl QueryState {
    #[must_use]
    pub fn new(limit: PageLimit) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
            search: String::new(),
            sort: SortState::default(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> PageLimit {
        self.limit
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn sort(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        total_pages(self.total, self.limit)
    }

    /// Highest page the cursor may sit on; page 1 exists even with no records
    #[must_use]
    pub const fn last_page(&self) -> usize {
        let pages = self.total_pages();
        if pages == 0 { 1 } else { pages }
    }

    /// Move to `page`, clamped into `[1, last_page]`. Returns whether it moved.
    pub fn set_page(&mut self, page: usize) -> bool {
        let page = page.clamp(1, self.last_page());
        let changed = page != self.page;
        self.page = page;
        changed
    }

    /// Change the page size; the cursor always returns to page 1
    pub fn set_limit(&mut self, limit: PageLimit) -> bool {
        let changed = limit != self.limit || self.page != 1;
        self.limit = limit;
        self.page = 1;
        changed
    }

    /// Change the search text; the cursor always returns to page 1
    pub fn set_search(&mut self, search: &str) -> bool {
        let changed = search != self.search || self.page != 1;
        search.clone_into(&mut self.search);
        self.page = 1;
        changed
    }

    pub fn set_sort_field(&mut self, field: &str) -> bool {
        let changed = field != self.sort.field;
        field.clone_into(&mut self.sort.field);
        changed
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        let changed = order != self.sort.order;
        self.sort.order = order;
        changed
    }

    /// Record the server-reported total and pull the cursor back into range.
    /// Returns whether the page had to move.
    pub fn set_total(&mut self, total: usize) -> bool {
        self.total = total;
        let page = self.page.clamp(1, self.last_page());
        let moved = page != self.page;
        self.page = page;
        moved
    }

    /// Parameters for the next listing read
    #[must_use]
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            sort_field: self.sort.field.clone(),
            sort_order: self.sort.order,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn limit_of(n: usize) -> PageLimit {
        PageLimit::new(n).expect("non-zero")
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert_eq!(PageLimit::new(0), Err(QueryError::ZeroLimit));
        assert_eq!(PageLimit::try_from(0usize), Err(QueryError::ZeroLimit));
    }

    #[test]
    fn test_total_pages_exact_and_remainder() {
        assert_eq!(total_pages(0, limit_of(5)), 0);
        assert_eq!(total_pages(10, limit_of(5)), 2);
        assert_eq!(total_pages(11, limit_of(5)), 3);
        assert_eq!(total_pages(1, limit_of(30)), 1);
    }

    #[test]
    fn test_limit_change_resets_page() {
        let mut query = QueryState::default();
        query.set_total(100);
        query.set_page(4);
        assert_eq!(query.page(), 4);

        assert!(query.set_limit(limit_of(10)));
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit().get(), 10);
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut query = QueryState::default();
        query.set_total(50);
        query.set_page(3);

        assert!(query.set_search("ali"));
        assert_eq!(query.page(), 1);
        assert_eq!(query.search(), "ali");
        assert!(!query.set_search("ali"));
    }

    #[test]
    fn test_page_is_clamped_into_range() {
        let mut query = QueryState::new(limit_of(5));
        query.set_total(12);
        assert!(!query.set_page(0));
        assert_eq!(query.page(), 1);
        query.set_page(99);
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn test_shrinking_total_pulls_page_back() {
        let mut query = QueryState::new(limit_of(5));
        query.set_total(11);
        query.set_page(3);

        assert!(query.set_total(10));
        assert_eq!(query.page(), 2);
        assert!(query.set_total(0));
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_list_query_uses_wire_names() {
        let mut query = QueryState::default();
        query.set_search("x");
        query.set_sort_field("name");
        query.set_sort_order(SortOrder::Asc);

        let value = serde_json::to_value(query.list_query()).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "page": 1,
                "limit": 5,
                "search": "x",
                "sortField": "name",
                "sortOrder": "asc"
            })
        );
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let query = QueryState::default();
        assert_eq!(query.sort().field, "createdAt");
        assert_eq!(query.sort().order, SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_parses_wire_form() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Asc.flipped(), SortOrder::Desc);
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling(total in 0usize..100_000, n in 1usize..500) {
            let pages = total_pages(total, limit_of(n));
            prop_assert!(pages * n >= total);
            prop_assert!(pages == 0 || (pages - 1) * n < total);
            prop_assert_eq!(pages == 0, total == 0);
        }

        #[test]
        fn page_stays_in_range(total in 0usize..1_000, n in 1usize..50, page in 0usize..200) {
            let mut query = QueryState::new(limit_of(n));
            query.set_total(total);
            query.set_page(page);
            prop_assert!(query.page() >= 1);
            prop_assert!(query.page() <= query.total_pages().max(1));
        }
    }
}
