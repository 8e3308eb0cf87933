use deskboard_api::{DEFAULT_LIMITS, PageLimit, QueryState, total_pages};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Pages shown in full before the window collapses around the cursor
const FULL_WINDOW: usize = 7;

/// Receives the events a pager emits
pub trait PagerHandler {
    fn on_page_change(&mut self, page: usize);
    fn on_limit_change(&mut self, limit: PageLimit);
}

impl PagerHandler for QueryState {
    fn on_page_change(&mut self, page: usize) {
        self.set_page(page);
    }

    fn on_limit_change(&mut self, limit: PageLimit) {
        self.set_limit(limit);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page controls to show for `page` out of `total_pages`
#[must_use]
pub fn page_window(page: usize, total_pages: usize) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    let last = total_pages;
    if last <= FULL_WINDOW {
        return (1..=last).map(Page).collect();
    }

    if page <= 4 {
        vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(last)]
    } else if page >= last - 3 {
        let mut items = vec![Page(1), Ellipsis];
        items.extend((last - 4..=last).map(Page));
        items
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(page - 1),
            Page(page),
            Page(page + 1),
            Ellipsis,
            Page(last),
        ]
    }
}

/// Page-number controls and page-size menu for a listing
#[derive(Debug, Clone, Copy)]
pub struct Pager<'a> {
    page: usize,
    limit: PageLimit,
    total: usize,
    limits: &'a [PageLimit],
}

impl<'a> Pager<'a> {
    #[must_use]
    pub const fn new(page: usize, limit: PageLimit, total: usize) -> Self {
        Self {
            page,
            limit,
            total,
            limits: &DEFAULT_LIMITS,
        }
    }

    #[must_use]
    pub fn from_query(query: &QueryState) -> Self {
        Self::new(query.page(), query.limit(), query.total())
    }

    #[must_use]
    pub const fn limits(mut self, limits: &'a [PageLimit]) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        total_pages(self.total, self.limit)
    }

    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.page, self.total_pages())
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page != 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        let pages = self.total_pages();
        !(self.page == pages || pages == 0)
    }

    /// Activate one control of the window; ellipses do nothing
    pub fn activate(&self, item: PageItem, handler: &mut impl PagerHandler) {
        match item {
            PageItem::Page(page) => handler.on_page_change(page),
            PageItem::Ellipsis => {}
        }
    }

    pub fn previous(&self, handler: &mut impl PagerHandler) -> bool {
        if !self.has_previous() {
            return false;
        }
        handler.on_page_change(self.page.saturating_sub(1).max(1));
        true
    }

    pub fn next(&self, handler: &mut impl PagerHandler) -> bool {
        if !self.has_next() {
            return false;
        }
        handler.on_page_change(self.page + 1);
        true
    }

    pub fn first(&self, handler: &mut impl PagerHandler) -> bool {
        if self.page == 1 {
            return false;
        }
        handler.on_page_change(1);
        true
    }

    pub fn last(&self, handler: &mut impl PagerHandler) -> bool {
        let pages = self.total_pages();
        if pages == 0 || self.page == pages {
            return false;
        }
        handler.on_page_change(pages);
        true
    }

    /// Choose a page size; nothing is emitted when it is already current
    pub fn select_limit(
        &self,
        limit: PageLimit,
        handler: &mut impl PagerHandler,
    ) -> bool {
        if limit == self.limit {
            return false;
        }
        handler.on_limit_change(limit);
        true
    }

    /// Step to the next larger size in the menu, wrapping around
    pub fn next_limit(&self, handler: &mut impl PagerHandler) -> bool {
        let next = match self.limit_position() {
            Some(index) => self.limits.get(index + 1).or_else(|| self.limits.first()),
            None => self.limits.iter().find(|l| **l > self.limit).or_else(|| self.limits.first()),
        };
        next.is_some_and(|limit| self.select_limit(*limit, handler))
    }

    /// Step to the next smaller size in the menu, wrapping around
    pub fn previous_limit(&self, handler: &mut impl PagerHandler) -> bool {
        let previous = match self.limit_position() {
            Some(index) => index
                .checked_sub(1)
                .and_then(|i| self.limits.get(i))
                .or_else(|| self.limits.last()),
            None => self
                .limits
                .iter()
                .rev()
                .find(|l| **l < self.limit)
                .or_else(|| self.limits.last()),
        };
        previous.is_some_and(|limit| self.select_limit(*limit, handler))
    }

    fn limit_position(&self) -> Option<usize> {
        self.limits.iter().position(|limit| *limit == self.limit)
    }

    fn summary(&self) -> String {
        let pages = self.total_pages();
        let noun = if self.total == 1 { "record" } else { "records" };
        if pages == 0 {
            format!("No pages · {} {noun}", self.total)
        } else {
            format!("Page {} of {pages} · {} {noun}", self.page, self.total)
        }
    }
}

impl Widget for Pager<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let enabled = Style::default().fg(Color::White);
        let disabled = Style::default().fg(Color::DarkGray);
        let current = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::raw("Rows: ").dark_gray()];
        for limit in self.limits {
            let label = format!(" {limit} ");
            if *limit == self.limit {
                spans.push(Span::styled(format!("[{limit}]"), current));
            } else {
                spans.push(Span::styled(label, disabled));
            }
        }
        spans.push(Span::raw("   "));

        spans.push(Span::styled(
            " ‹ ",
            if self.has_previous() { enabled } else { disabled },
        ));
        for item in self.window() {
            match item {
                PageItem::Page(page) if page == self.page => {
                    spans.push(Span::styled(format!(" {page} "), current));
                }
                PageItem::Page(page) => {
                    spans.push(Span::styled(format!(" {page} "), enabled));
                }
                PageItem::Ellipsis => spans.push(Span::styled(" … ", disabled)),
            }
        }
        spans.push(Span::styled(
            " › ",
            if self.has_next() { enabled } else { disabled },
        ));
        spans.push(Span::raw("   "));
        spans.push(Span::raw(self.summary()).dark_gray());

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{PageItem::Ellipsis, PageItem::Page, *};

    fn limit(n: usize) -> PageLimit {
        PageLimit::new(n).expect("non-zero")
    }

    #[derive(Default)]
    struct Recorder {
        pages: Vec<usize>,
        limits: Vec<usize>,
    }

    impl PagerHandler for Recorder {
        fn on_page_change(&mut self, page: usize) {
            self.pages.push(page);
        }

        fn on_limit_change(&mut self, limit: PageLimit) {
            self.limits.push(limit.get());
        }
    }

    #[test]
    fn test_no_records_means_empty_window_and_disabled_controls() {
        let pager = Pager::new(1, limit(5), 0);
        assert_eq!(pager.total_pages(), 0);
        assert!(pager.window().is_empty());
        assert!(!pager.has_previous());
        assert!(!pager.has_next());

        let mut recorder = Recorder::default();
        assert!(!pager.next(&mut recorder));
        assert!(!pager.previous(&mut recorder));
        assert!(recorder.pages.is_empty());
    }

    #[test]
    fn test_seven_pages_shown_in_full() {
        for page in 1..=7 {
            assert_eq!(page_window(page, 7), (1..=7).map(Page).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_window_in_middle() {
        assert_eq!(
            page_window(6, 10),
            vec![
                Page(1),
                Ellipsis,
                Page(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(10)
            ]
        );
    }

    #[test]
    fn test_numeric_control_emits_page_and_ellipsis_does_not() {
        let pager = Pager::new(6, limit(5), 50);
        let mut recorder = Recorder::default();
        for item in pager.window() {
            pager.activate(item, &mut recorder);
        }
        assert_eq!(recorder.pages, vec![1, 5, 6, 7, 10]);
    }

    #[test]
    fn test_previous_and_next_bounds() {
        let mut recorder = Recorder::default();
        let first = Pager::new(1, limit(5), 12);
        assert!(!first.has_previous());
        assert!(first.next(&mut recorder));

        let last = Pager::new(3, limit(5), 12);
        assert!(!last.has_next());
        assert!(last.previous(&mut recorder));
        assert_eq!(recorder.pages, vec![2, 2]);
    }

    #[test]
    fn test_limit_choice_emits_without_touching_page() {
        let pager = Pager::new(4, limit(5), 100);
        let mut recorder = Recorder::default();
        assert!(!pager.select_limit(limit(5), &mut recorder));
        assert!(pager.select_limit(limit(20), &mut recorder));
        assert_eq!(recorder.limits, vec![20]);
        assert!(recorder.pages.is_empty());
    }

    #[test]
    fn test_limit_menu_cycles() {
        let mut recorder = Recorder::default();
        Pager::new(1, limit(30), 100).next_limit(&mut recorder);
        Pager::new(1, limit(5), 100).next_limit(&mut recorder);
        Pager::new(1, limit(2), 100).previous_limit(&mut recorder);
        Pager::new(1, limit(7), 100).next_limit(&mut recorder);
        assert_eq!(recorder.limits, vec![2, 10, 30, 10]);
    }

    #[test]
    fn test_query_state_resets_page_on_limit_change() {
        let mut query = QueryState::default();
        query.set_total(100);
        Pager::from_query(&query).last(&mut query);
        assert_eq!(query.page(), 20);

        Pager::from_query(&query).next_limit(&mut query);
        assert_eq!(query.limit().get(), 10);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_render_marks_current_page() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 100, 1));
        Pager::new(2, limit(5), 12).render(buf.area, &mut buf);
        let line = (0..buf.area.width)
            .filter_map(|x| buf.cell((x, 0)))
            .map(ratatui::buffer::Cell::symbol)
            .collect::<String>();
        assert!(line.contains("[5]"));
        assert!(line.contains(" 1  2  3 "));
        assert!(line.contains("Page 2 of 3 · 12 records"));
    }

    proptest! {
        #[test]
        fn window_ends_on_last_page(total in 1usize..10_000, n in 1usize..50, page in 1usize..400) {
            let pages = total_pages(total, limit(n));
            let page = page.min(pages);
            let window = page_window(page, pages);
            prop_assert_eq!(window.last().copied(), Some(Page(pages)));
            prop_assert_eq!(window.first().copied(), Some(Page(1)));
            prop_assert!(window.len() <= FULL_WINDOW);
            prop_assert!(window.contains(&Page(page)));
        }
    }
}
