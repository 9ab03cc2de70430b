//! Fixed-size page window over the record store.
//!
//! The window keeps a local page cursor and derives the visible slice of the
//! store from it. Whenever the cursor lands within `ahead_threshold` pages of
//! the end of what has been fetched, [`PaginatedWindow::maybe_prefetch`] claims
//! the next remote page so the user rarely reaches the end of loaded data.
//!
//! It also renders the pagination control itself, either as Arabic numerals
//! (`"3/10"`) or as dots (`"○ ○ ● ○ ○"`), and computes the row of direct-jump
//! page buttons.
//!
//! # Examples
//!
//! ```rust
//! use show_explorer::paginated::PaginatedWindow;
//! use show_explorer::record::{Record, RecordId};
//! use show_explorer::store::RecordStore;
//!
//! #[derive(Clone)]
//! struct Item(RecordId);
//! impl Record for Item {
//!     fn id(&self) -> RecordId { self.0 }
//! }
//!
//! let mut store = RecordStore::new();
//! store.append((0..25).map(Item));
//!
//! let mut window = PaginatedWindow::new(10, 2);
//! assert_eq!(window.total_pages(store.len()), 3);
//! assert!(window.go_to_page(2, store.len()));
//! assert_eq!(window.visible_slice(&store).len(), 5);
//! assert!(!window.go_to_page(3, store.len())); // out of range: no-op
//! ```

use crate::record::Record;
use crate::store::{PageRequest, RecordStore};
use serde::{Deserialize, Serialize};

/// How the pagination control is drawn. Selected with `"pagination"` in the
/// config file (`"arabic"` or `"dots"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// Page numbers, e.g. "1/5".
    #[default]
    Arabic,
    /// One dot per page with the current one highlighted.
    Dots,
}

/// Local page cursor over the record store.
#[derive(Debug, Clone)]
pub struct PaginatedWindow {
    page: usize,
    page_size: usize,
    ahead_threshold: usize,

    /// Style of the pagination control.
    pub paginator_type: Type,
    /// Marker for the current page in Dots mode.
    pub active_dot: String,
    /// Marker for the other pages in Dots mode.
    pub inactive_dot: String,
    /// Format for Arabic mode; the two `%d` are current page and total.
    pub arabic_format: String,
}

impl Default for PaginatedWindow {
    fn default() -> Self {
        Self::new(12, 2)
    }
}

impl PaginatedWindow {
    /// Creates a window on local page 0. A `page_size` of zero is clamped to 1.
    pub fn new(page_size: usize, ahead_threshold: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            ahead_threshold,
            paginator_type: Type::default(),
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            arabic_format: "%d/%d".to_string(),
        }
    }

    /// Sets how the control is drawn.
    pub fn with_type(mut self, paginator_type: Type) -> Self {
        self.paginator_type = paginator_type;
        self
    }

    /// Current local page, zero-based.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Records per local page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Local pages left at which a prefetch starts.
    pub fn ahead_threshold(&self) -> usize {
        self.ahead_threshold
    }

    /// Number of local pages for a store holding `len` records.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Start (inclusive) and end (exclusive) store indices of the current page,
    /// clipped to `len`.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.page * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        (start, end)
    }

    /// Records on the current local page.
    pub fn visible_slice<'a, R: Record>(&self, store: &'a RecordStore<R>) -> &'a [R] {
        let (start, end) = self.slice_bounds(store.len());
        &store.records()[start..end]
    }

    /// Moves to page `n` when it exists. Returns whether the cursor was set;
    /// callers scroll the viewport back to the top and run
    /// [`maybe_prefetch`](Self::maybe_prefetch) when it was.
    pub fn go_to_page(&mut self, n: usize, len: usize) -> bool {
        if n >= self.total_pages(len) {
            return false;
        }
        self.page = n;
        true
    }

    /// Advances one page if there is one. Returns whether the page changed.
    pub fn next_page(&mut self, len: usize) -> bool {
        if self.on_last_page(len) {
            return false;
        }
        self.go_to_page(self.page + 1, len)
    }

    /// Goes back one page. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        if self.on_first_page() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// True on page 0.
    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    /// True on the last page of the `len` records loaded so far.
    pub fn on_last_page(&self, len: usize) -> bool {
        self.page + 1 >= self.total_pages(len)
    }

    /// Pages left after the current one among the records already fetched.
    pub fn pages_remaining(&self, len: usize) -> usize {
        self.total_pages(len).saturating_sub(self.page + 1)
    }

    /// Claims the next remote page when the cursor is within `ahead_threshold`
    /// pages of the end of fetched data and the store can still fetch.
    pub fn maybe_prefetch<R: Record>(&self, store: &mut RecordStore<R>) -> Option<PageRequest> {
        if self.pages_remaining(store.len()) > self.ahead_threshold {
            return None;
        }
        if store.is_exhausted() || store.is_fetching() {
            return None;
        }
        let request = store.begin_request();
        if let Some(request) = &request {
            tracing::debug!(
                local_page = self.page,
                remote_page = request.page,
                "prefetching for paginated view"
            );
        }
        request
    }

    /// Returns the cursor to page 0.
    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Pulls the cursor back inside `[0, total_pages)` after the store changed.
    pub fn clamp(&mut self, len: usize) {
        let total = self.total_pages(len);
        if self.page >= total {
            self.page = total.saturating_sub(1);
        }
    }

    /// Page numbers to offer as direct jumps: at most `max_buttons` pages,
    /// centred on the current page and shifted to stay in range.
    pub fn page_buttons(&self, len: usize, max_buttons: usize) -> Vec<usize> {
        let total = self.total_pages(len);
        if total == 0 || max_buttons == 0 {
            return Vec::new();
        }
        let current = self.page.min(total - 1);
        let mut start = current.saturating_sub(max_buttons / 2);
        let end = (start + max_buttons - 1).min(total - 1);
        if end - start < max_buttons - 1 {
            start = (end + 1).saturating_sub(max_buttons);
        }
        (start..=end).collect()
    }

    /// Renders the pagination control for a store of `len` records.
    pub fn view(&self, len: usize) -> String {
        match self.paginator_type {
            Type::Arabic => self.arabic_view(len),
            Type::Dots => self.dots_view(len),
        }
    }

    fn arabic_view(&self, len: usize) -> String {
        self.arabic_format
            .replacen("%d", &(self.page + 1).to_string(), 1)
            .replacen("%d", &self.total_pages(len).max(1).to_string(), 1)
    }

    fn dots_view(&self, len: usize) -> String {
        let total = self.total_pages(len).max(1);
        (0..total)
            .map(|i| {
                if i == self.page {
                    self.active_dot.as_str()
                } else {
                    self.inactive_dot.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, items, Item};

    fn store_with(n: u64) -> RecordStore<Item> {
        let mut store = RecordStore::new();
        store.append(items(0..n));
        store
    }

    #[test]
    fn test_visible_slice_clips_to_store() {
        let store = store_with(23);
        let mut window = PaginatedWindow::new(10, 2);
        assert_eq!(ids(window.visible_slice(&store)), (0..10).collect::<Vec<_>>());
        window.go_to_page(2, store.len());
        assert_eq!(ids(window.visible_slice(&store)), vec![20, 21, 22]);
    }

    #[test]
    fn test_visible_slice_on_empty_store() {
        let store: RecordStore<Item> = RecordStore::new();
        let window = PaginatedWindow::new(10, 2);
        assert!(window.visible_slice(&store).is_empty());
        assert_eq!(window.total_pages(0), 0);
    }

    #[test]
    fn test_go_to_page_bounds() {
        let mut window = PaginatedWindow::new(10, 2);
        assert!(window.go_to_page(1, 20));
        assert_eq!(window.page(), 1);
        assert!(!window.go_to_page(2, 20));
        assert_eq!(window.page(), 1);
        assert!(!window.go_to_page(0, 0));
    }

    #[test]
    fn test_next_and_previous_stop_at_bounds() {
        let mut window = PaginatedWindow::new(10, 2);
        assert!(!window.previous_page());
        assert!(window.next_page(20));
        assert!(!window.next_page(20));
        assert_eq!(window.page(), 1);
        assert!(window.previous_page());
        assert_eq!(window.page(), 0);
    }

    #[test]
    fn test_prefetch_triggers_within_threshold() {
        // 20 records = 2 pages; on page 0 one page remains, which is <= 2.
        let mut store = store_with(20);
        let window = PaginatedWindow::new(10, 2);
        assert_eq!(window.pages_remaining(store.len()), 1);
        let request = window.maybe_prefetch(&mut store).unwrap();
        assert_eq!(request.page, 0);
        assert!(store.is_fetching());
    }

    #[test]
    fn test_prefetch_waits_when_far_from_end() {
        let mut store = store_with(100);
        let window = PaginatedWindow::new(10, 2);
        assert!(window.maybe_prefetch(&mut store).is_none());
        assert!(!store.is_fetching());
    }

    #[test]
    fn test_prefetch_respects_in_flight_and_exhaustion() {
        let mut store = store_with(10);
        let window = PaginatedWindow::new(10, 2);
        let pending = window.maybe_prefetch(&mut store).unwrap();
        assert!(window.maybe_prefetch(&mut store).is_none());

        store.complete_request(pending, Ok(Vec::new()));
        assert!(window.maybe_prefetch(&mut store).is_none());
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut window = PaginatedWindow::new(10, 2);
        window.go_to_page(4, 50);
        window.clamp(25);
        assert_eq!(window.page(), 2);
        window.clamp(0);
        assert_eq!(window.page(), 0);
    }

    #[test]
    fn test_page_buttons_centre_and_shift() {
        let mut window = PaginatedWindow::new(10, 2);
        assert_eq!(window.page_buttons(100, 5), vec![0, 1, 2, 3, 4]);
        window.go_to_page(5, 100);
        assert_eq!(window.page_buttons(100, 5), vec![3, 4, 5, 6, 7]);
        window.go_to_page(9, 100);
        assert_eq!(window.page_buttons(100, 5), vec![5, 6, 7, 8, 9]);
        assert_eq!(window.page_buttons(100, 3), vec![7, 8, 9]);
        assert_eq!(window.page_buttons(20, 5), vec![0, 1]);
        assert!(window.page_buttons(0, 5).is_empty());
    }

    #[test]
    fn test_arabic_and_dots_views() {
        let mut window = PaginatedWindow::new(10, 2);
        assert_eq!(window.view(50), "1/5");
        window.go_to_page(2, 50);
        assert_eq!(window.view(50), "3/5");

        window.paginator_type = Type::Dots;
        assert_eq!(window.view(50), "○ ○ • ○ ○");
        window.reset();
        assert_eq!(window.view(0), "•");
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let window = PaginatedWindow::new(0, 2);
        assert_eq!(window.page_size(), 1);
        assert_eq!(window.total_pages(3), 3);
    }
}
