//! The loading coordinator.
//!
//! [`Catalog`] ties the record store to the two presentation windows, the
//! active [`Mode`] and the scroll memory. Every state change goes through one of
//! its named operations; the event loop only forwards user actions and page
//! results and performs the requests it is handed back.
//!
//! ## Request flow
//!
//! Operations that may need remote data return a [`PageRequest`]. The caller
//! fetches that page (in the terminal app, as an async `Cmd`) and hands the
//! result to [`Catalog::page_loaded`], which applies it to the store and lets
//! the active window continue. At most one request is outstanding at a time;
//! the store refuses to issue a second one.
//!
//! ## Mode switching
//!
//! [`Catalog::flip_mode`] always returns the paginated cursor to page 0. The
//! infinite window is reset only when it has nothing on display yet, so
//! flipping back and forth keeps infinite-scroll progress.
//!
//! # Examples
//!
//! ```rust
//! use show_explorer::catalog::{Catalog, Mode};
//! use show_explorer::record::{Record, RecordId};
//!
//! #[derive(Clone)]
//! struct Item(RecordId);
//! impl Record for Item {
//!     fn id(&self) -> RecordId { self.0 }
//! }
//!
//! let mut catalog: Catalog<Item> = Catalog::new(10, 2, 5);
//! let request = catalog.mount().unwrap();
//! assert_eq!(request.page, 0);
//!
//! let step = catalog.page_loaded(request, Mode::Paginated, Ok((0..20).map(Item).collect()), true);
//! assert_eq!(catalog.visible_slice().len(), 10);
//! assert!(step.follow_up.is_some()); // only one page ahead: prefetch
//! ```

use crate::config::Config;
use crate::infinite::{InfiniteWindow, RevealStep};
use crate::paginated::PaginatedWindow;
use crate::record::Record;
use crate::scroll::ScrollMemory;
use crate::source::{PageSource, SourceError};
use crate::store::{FetchOutcome, PageRequest, RecordStore};
use std::time::Duration;

/// Which presentation window is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fixed-size local pages.
    #[default]
    Paginated,
    /// A list that grows as it is scrolled.
    Infinite,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::Paginated => Mode::Infinite,
            Mode::Infinite => Mode::Paginated,
        }
    }

    /// Short name for the header badge.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Paginated => "pages",
            Mode::Infinite => "infinite",
        }
    }
}

/// Result of a local page move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    /// The cursor moved; the viewport should scroll to the top.
    pub moved: bool,
    /// Remote page to fetch next, if the move brought the end of data close.
    pub request: Option<PageRequest>,
}

/// Result of [`Catalog::page_loaded`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStep {
    /// What the store made of the result.
    pub outcome: FetchOutcome,
    /// Records newly displayed by the infinite window.
    pub revealed: usize,
    /// A further remote page the paginated window wants right away.
    pub follow_up: Option<PageRequest>,
}

/// Coordinates the record store, both windows, the active mode and the scroll memory.
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    store: RecordStore<R>,
    paginated: PaginatedWindow,
    infinite: InfiniteWindow<R>,
    mode: Mode,
    scroll: ScrollMemory,
}

impl<R: Record + Clone> Catalog<R> {
    /// An empty catalog in paginated mode.
    pub fn new(page_size: usize, ahead_threshold: usize, load_more_threshold: usize) -> Self {
        Self {
            store: RecordStore::new(),
            paginated: PaginatedWindow::new(page_size, ahead_threshold),
            infinite: InfiniteWindow::new(page_size, load_more_threshold),
            mode: Mode::default(),
            scroll: ScrollMemory::default(),
        }
    }

    /// A catalog sized and timed from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: RecordStore::new(),
            paginated: PaginatedWindow::new(config.page_size, config.ahead_threshold)
                .with_type(config.pagination),
            infinite: InfiniteWindow::new(config.page_size, config.load_more_threshold),
            mode: Mode::default(),
            scroll: ScrollMemory::new(Duration::from_millis(config.restore_delay_ms)),
        }
    }

    /// The shared record store.
    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// The paginated window.
    pub fn paginated(&self) -> &PaginatedWindow {
        &self.paginated
    }

    /// The infinite window.
    pub fn infinite(&self) -> &InfiniteWindow<R> {
        &self.infinite
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Remembered scroll offsets.
    pub fn scroll(&self) -> &ScrollMemory {
        &self.scroll
    }

    /// Records the active window currently shows.
    pub fn visible_slice(&self) -> &[R] {
        match self.mode {
            Mode::Paginated => self.paginated.visible_slice(&self.store),
            Mode::Infinite => self.infinite.visible_slice(),
        }
    }

    /// True while the very first page is on its way.
    pub fn is_loading_initial(&self) -> bool {
        self.store.is_empty() && self.store.is_fetching()
    }

    /// See [`InfiniteWindow::has_more`].
    pub fn has_more(&self) -> bool {
        self.infinite.has_more(&self.store)
    }

    /// Whether the infinite list's sentinel should trigger reveals.
    pub fn sentinel_armed(&self) -> bool {
        self.mode == Mode::Infinite && self.infinite.is_armed(&self.store)
    }

    /// Activates the current window when the list view is shown.
    ///
    /// An empty store starts the initial page-0 request. Otherwise the infinite
    /// window seeds its first increment, or the paginated window checks whether
    /// it should prefetch.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.store.is_empty() {
            return self.store.begin_request();
        }
        match self.mode {
            Mode::Infinite => {
                self.infinite.seed(&self.store);
                None
            }
            Mode::Paginated => {
                self.paginated.clamp(self.store.len());
                self.paginated.maybe_prefetch(&mut self.store)
            }
        }
    }

    /// Applies a finished request and lets the active window continue.
    ///
    /// The result always reaches the store. The window only reacts when
    /// `origin` is still the active mode and `active` says the list view that
    /// issued the request is still on screen.
    pub fn page_loaded(
        &mut self,
        request: PageRequest,
        origin: Mode,
        result: Result<Vec<R>, SourceError>,
        active: bool,
    ) -> LoadStep {
        let outcome = self.store.complete_request(request, result);
        let mut step = LoadStep {
            outcome,
            revealed: 0,
            follow_up: None,
        };
        if step.outcome == FetchOutcome::Ignored {
            return step;
        }

        if !active || origin != self.mode {
            if origin == Mode::Infinite {
                self.infinite.cancel_pending();
            }
            return step;
        }

        match self.mode {
            Mode::Infinite => {
                step.revealed = if self.infinite.is_pending() {
                    self.infinite.complete_reveal(&self.store)
                } else {
                    self.infinite.seed(&self.store)
                };
            }
            Mode::Paginated => {
                step.follow_up = self.paginated.maybe_prefetch(&mut self.store);
            }
        }
        step
    }

    /// Moves the paginated cursor to local page `n`.
    pub fn go_to_page(&mut self, n: usize) -> Navigation {
        let moved = self.paginated.go_to_page(n, self.store.len());
        self.after_page_move(moved)
    }

    /// Moves one local page forward.
    pub fn next_page(&mut self) -> Navigation {
        let moved = self.paginated.next_page(self.store.len());
        self.after_page_move(moved)
    }

    /// Moves one local page back.
    pub fn previous_page(&mut self) -> Navigation {
        let moved = self.paginated.previous_page();
        self.after_page_move(moved)
    }

    fn after_page_move(&mut self, moved: bool) -> Navigation {
        let request = if moved {
            self.paginated.maybe_prefetch(&mut self.store)
        } else {
            None
        };
        Navigation { moved, request }
    }

    /// Sentinel became visible in infinite mode.
    pub fn reveal_more(&mut self) -> RevealStep {
        if self.mode != Mode::Infinite {
            return RevealStep::Idle;
        }
        self.infinite.reveal_more(&mut self.store)
    }

    /// Remembers `offset` for the active mode.
    pub fn capture_scroll(&mut self, offset: usize) {
        self.scroll.capture(self.mode, offset);
    }

    /// Switches between paginated and infinite presentation.
    ///
    /// `offset` is the current scroll position, remembered for the mode being
    /// left. The local page cursor returns to 0. Entering infinite mode with
    /// nothing displayed also restarts its reveal cursor, remote paging and
    /// remembered offset; otherwise infinite progress is kept.
    pub fn flip_mode(&mut self, offset: usize) -> Mode {
        self.scroll.capture(self.mode, offset);
        self.mode = self.mode.toggled();
        self.paginated.reset();

        if self.mode == Mode::Infinite && self.infinite.is_empty() {
            self.infinite.reset();
            self.store.rewind_remote();
            self.scroll.clear_infinite();
        }
        tracing::debug!(mode = self.mode.label(), "view mode switched");
        self.mode
    }

    /// Discards all records and cursor state, e.g. when switching data source.
    pub fn reset(&mut self) {
        self.store.reset();
        self.paginated.reset();
        self.infinite.reset();
        self.scroll.clear_infinite();
    }

    /// Mounts the view and runs every request it leads to against `source`.
    /// Returns the outcome of each request in order.
    pub async fn load_initial<S>(&mut self, source: &S) -> Vec<FetchOutcome>
    where
        S: PageSource<R> + ?Sized,
    {
        let first = self.mount();
        self.drive(first, source).await
    }

    /// Moves to local page `n` and performs any prefetch it triggers.
    pub async fn go_to_page_with<S>(&mut self, n: usize, source: &S) -> bool
    where
        S: PageSource<R> + ?Sized,
    {
        let navigation = self.go_to_page(n);
        self.drive(navigation.request, source).await;
        navigation.moved
    }

    /// Reveals the next increment, fetching first when needed. Returns the
    /// number of records newly displayed.
    pub async fn reveal_more_with<S>(&mut self, source: &S) -> usize
    where
        S: PageSource<R> + ?Sized,
    {
        match self.reveal_more() {
            RevealStep::Idle => 0,
            RevealStep::Revealed(count) => count,
            RevealStep::Fetch(request) => {
                let result = source.fetch_page(request.page).await;
                self.page_loaded(request, Mode::Infinite, result, true)
                    .revealed
            }
        }
    }

    async fn drive<S>(&mut self, mut next: Option<PageRequest>, source: &S) -> Vec<FetchOutcome>
    where
        S: PageSource<R> + ?Sized,
    {
        let mut outcomes = Vec::new();
        while let Some(request) = next {
            let result = source.fetch_page(request.page).await;
            let step = self.page_loaded(request, self.mode, result, true);
            outcomes.push(step.outcome);
            next = step.follow_up;
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginated::Type;
    use crate::testing::{ids, items, Item, ScriptedSource};

    fn catalog() -> Catalog<Item> {
        Catalog::new(10, 2, 5)
    }

    #[test]
    fn test_initial_load_shows_first_page() {
        let mut catalog = catalog();
        let request = catalog.mount().unwrap();
        assert!(catalog.is_loading_initial());

        let step = catalog.page_loaded(request, Mode::Paginated, Ok(items(0..20)), true);
        assert_eq!(ids(catalog.visible_slice()), (0..10).collect::<Vec<_>>());
        assert_eq!(catalog.paginated().total_pages(catalog.store().len()), 2);
        // Two pages loaded, cursor on the first: one page remains, prefetch.
        assert_eq!(step.follow_up.map(|r| r.page), Some(1));
    }

    #[test]
    fn test_mount_is_noop_while_initial_request_pending() {
        let mut catalog = catalog();
        assert!(catalog.mount().is_some());
        assert!(catalog.mount().is_none());
    }

    #[test]
    fn test_navigation_triggers_prefetch() {
        let mut catalog: Catalog<Item> = Catalog::new(10, 2, 5);
        let request = catalog.mount().unwrap();
        let step = catalog.page_loaded(request, Mode::Paginated, Ok(items(0..60)), true);
        assert!(step.follow_up.is_none());

        let nav = catalog.go_to_page(3);
        assert!(nav.moved);
        assert_eq!(nav.request.map(|r| r.page), Some(1));

        let nav = catalog.next_page();
        assert!(nav.moved);
        assert!(nav.request.is_none(), "fetch already in flight");
    }

    #[test]
    fn test_out_of_range_page_does_not_fetch() {
        let mut catalog = catalog();
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Paginated, Ok(items(0..60)), true);
        let nav = catalog.go_to_page(6);
        assert!(!nav.moved);
        assert!(nav.request.is_none());
        assert!(!catalog.previous_page().moved);
    }

    #[test]
    fn test_initial_load_in_infinite_mode_seeds_reveal() {
        let mut catalog = catalog();
        catalog.flip_mode(0);
        let request = catalog.mount().unwrap();
        let step = catalog.page_loaded(request, Mode::Infinite, Ok(items(0..25)), true);
        assert_eq!(step.revealed, 10);
        assert_eq!(catalog.infinite().revealed_count(), 10);
        assert!(catalog.has_more());
    }

    #[test]
    fn test_reveal_fetches_then_completes() {
        let mut catalog = catalog();
        catalog.flip_mode(0);
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Infinite, Ok(items(0..12)), true);

        let RevealStep::Fetch(request) = catalog.reveal_more() else {
            panic!("expected fetch before reveal");
        };
        assert!(!catalog.sentinel_armed());
        let step = catalog.page_loaded(request, Mode::Infinite, Ok(items(12..40)), true);
        assert_eq!(step.revealed, 10);
        assert_eq!(catalog.infinite().revealed_count(), 20);
    }

    #[test]
    fn test_inactive_window_ignores_late_result() {
        let mut catalog = catalog();
        catalog.flip_mode(0);
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Infinite, Ok(items(0..12)), true);
        let RevealStep::Fetch(request) = catalog.reveal_more() else {
            panic!("expected fetch");
        };

        catalog.flip_mode(0);
        let step = catalog.page_loaded(request, Mode::Infinite, Ok(items(12..40)), true);
        assert_eq!(step.revealed, 0);
        assert!(step.follow_up.is_none());
        assert_eq!(catalog.store().len(), 40, "store still receives the page");
        assert!(!catalog.infinite().is_pending());
    }

    #[test]
    fn test_flip_into_empty_infinite_resets_remote_paging() {
        let mut catalog = catalog();
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Paginated, Ok(items(0..100)), true);
        let nav = catalog.go_to_page(8);
        let request = nav.request.unwrap();
        catalog.page_loaded(request, Mode::Paginated, Ok(Vec::new()), true);
        assert!(catalog.store().is_exhausted());
        assert_eq!(catalog.store().next_remote_page(), 1);

        assert_eq!(catalog.flip_mode(250), Mode::Infinite);
        assert_eq!(catalog.paginated().page(), 0);
        assert_eq!(catalog.infinite().revealed_count(), 0);
        assert_eq!(catalog.store().next_remote_page(), 0);
        assert!(!catalog.store().is_exhausted());
        assert_eq!(catalog.store().len(), 100);
    }

    #[test]
    fn test_prefetch_in_flight_does_not_undo_flip_rewind() {
        let mut catalog = catalog();
        let request = catalog.mount().unwrap();
        let step = catalog.page_loaded(request, Mode::Paginated, Ok(items(0..20)), true);
        let prefetch = step.follow_up.unwrap();
        assert_eq!(prefetch.page, 1);

        catalog.flip_mode(0);
        assert_eq!(catalog.store().next_remote_page(), 0);

        let step = catalog.page_loaded(prefetch, Mode::Paginated, Ok(items(20..30)), true);
        assert!(step.follow_up.is_none());
        assert_eq!(catalog.store().len(), 30);
        assert_eq!(catalog.store().next_remote_page(), 0);
        assert!(!catalog.store().is_fetching());
    }

    #[test]
    fn test_flip_preserves_infinite_progress() {
        let mut catalog = catalog();
        catalog.flip_mode(0);
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Infinite, Ok(items(0..50)), true);
        catalog.reveal_more();
        assert_eq!(catalog.infinite().revealed_count(), 20);
        let next_remote = catalog.store().next_remote_page();

        catalog.flip_mode(90);
        assert_eq!(catalog.mode(), Mode::Paginated);
        catalog.flip_mode(0);
        assert_eq!(catalog.mode(), Mode::Infinite);
        assert_eq!(catalog.infinite().revealed_count(), 20);
        assert_eq!(catalog.store().next_remote_page(), next_remote);
        assert_eq!(
            catalog
                .scroll()
                .offset_for(crate::scroll::RestoreContext::Mode(Mode::Infinite)),
            90
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut catalog = catalog();
        catalog.flip_mode(0);
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Infinite, Ok(items(0..30)), true);
        catalog.reset();
        assert!(catalog.store().is_empty());
        assert!(catalog.infinite().is_empty());
        assert_eq!(catalog.mount().map(|r| r.page), Some(0));
    }

    #[test]
    fn test_reveal_more_is_idle_in_paginated_mode() {
        let mut catalog = catalog();
        let request = catalog.mount().unwrap();
        catalog.page_loaded(request, Mode::Paginated, Ok(items(0..5)), true);
        assert_eq!(catalog.reveal_more(), RevealStep::Idle);
        assert!(!catalog.sentinel_armed());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            page_size: 6,
            restore_delay_ms: 250,
            pagination: Type::Dots,
            ..Config::default()
        };
        let catalog: Catalog<Item> = Catalog::from_config(&config);
        assert_eq!(catalog.paginated().page_size(), 6);
        assert_eq!(catalog.paginated().paginator_type, Type::Dots);
        assert_eq!(catalog.infinite().page_size(), 6);
        assert_eq!(catalog.scroll().delay(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_load_initial_chains_prefetch_until_exhausted() {
        let source = ScriptedSource::new()
            .with_page(0, items(0..20))
            .with_page(1, items(20..30));
        let mut catalog = catalog();

        let outcomes = catalog.load_initial(&source).await;
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[2], FetchOutcome::Exhausted { page: 2 });
        assert_eq!(source.calls(), vec![0, 1, 2]);
        assert_eq!(catalog.store().len(), 30);
    }

    #[tokio::test]
    async fn test_failed_initial_load_leaves_empty_usable_catalog() {
        let source = ScriptedSource::new().with_error(0, SourceError::Transport("dns".into()));
        let mut catalog = catalog();
        let outcomes = catalog.load_initial(&source).await;
        assert!(matches!(outcomes[0], FetchOutcome::Failed { page: 0, .. }));
        assert!(catalog.visible_slice().is_empty());
        assert!(catalog.mount().is_none());
    }

    #[tokio::test]
    async fn test_infinite_scroll_to_the_end() {
        let source = ScriptedSource::new()
            .with_page(0, items(0..12))
            .with_page(1, items(10..18));
        let mut catalog = catalog();
        catalog.flip_mode(0);
        catalog.load_initial(&source).await;
        assert_eq!(catalog.infinite().revealed_count(), 10);

        // 2 left <= 5: fetches page 1 (8 records, 2 overlapping), reveals 10..18.
        assert_eq!(catalog.reveal_more_with(&source).await, 8);
        // 0 left: fetches page 2, which is empty; nothing more to reveal.
        assert_eq!(catalog.reveal_more_with(&source).await, 0);
        assert!(!catalog.has_more());
        assert_eq!(catalog.reveal_more_with(&source).await, 0);
        assert_eq!(source.calls(), vec![0, 1, 2]);
        assert_eq!(ids(catalog.visible_slice()), (0..18).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_go_to_page_with_prefetches() {
        let source = ScriptedSource::new()
            .with_page(0, items(0..50))
            .with_page(1, items(50..100));
        let mut catalog = catalog();
        catalog.load_initial(&source).await;
        assert_eq!(source.calls(), vec![0]);

        assert!(catalog.go_to_page_with(3, &source).await);
        assert_eq!(source.calls(), vec![0, 1]);
        assert_eq!(catalog.store().len(), 100);
    }
}
