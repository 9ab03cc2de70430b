//! Continuously growing window over the record store.
//!
//! The infinite list shows a prefix of the store that grows by `page_size`
//! records each time the sentinel line below the last card scrolls into view.
//! Revealed records are copied into a separate displayed list and
//! deduplicated against it, so a record that reaches the store twice is still
//! only shown once.
//!
//! When few un-revealed records remain, a reveal first claims the next remote
//! page and then finishes once that page has been applied:
//!
//! ```text
//! reveal_more ──► RevealStep::Fetch(request)
//!                      │  (page source runs)
//!                      ▼
//! store.complete_request ──► complete_reveal ──► records revealed
//! ```

use crate::record::{Record, RecordId};
use crate::store::{PageRequest, RecordStore};
use std::collections::HashSet;

/// Result of one [`InfiniteWindow::reveal_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// Nothing to do: the window is terminal or a fetch is already pending.
    Idle,
    /// More records were revealed; the value is how many were newly displayed.
    Revealed(usize),
    /// A remote page must be fetched first. Call
    /// [`InfiniteWindow::complete_reveal`] once it has been applied to the store.
    Fetch(PageRequest),
}

/// Reveal state of the infinite list.
#[derive(Debug, Clone)]
pub struct InfiniteWindow<R> {
    displayed: Vec<R>,
    displayed_ids: HashSet<RecordId>,
    revealed: usize,
    page_size: usize,
    load_more_threshold: usize,
    pending_reveal: bool,
}

impl<R: Record + Clone> InfiniteWindow<R> {
    /// Creates an empty window. A `page_size` of zero is clamped to 1.
    pub fn new(page_size: usize, load_more_threshold: usize) -> Self {
        Self {
            displayed: Vec::new(),
            displayed_ids: HashSet::new(),
            revealed: 0,
            page_size: page_size.max(1),
            load_more_threshold,
            pending_reveal: false,
        }
    }

    /// Records shown so far, in reveal order.
    pub fn visible_slice(&self) -> &[R] {
        &self.displayed
    }

    /// How far into the store the window has advanced.
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Records revealed per increment.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Unrevealed records below which a reveal fetches first.
    pub fn load_more_threshold(&self) -> usize {
        self.load_more_threshold
    }

    /// True when nothing is displayed yet.
    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }

    /// True while a reveal is waiting on a remote page.
    pub fn is_pending(&self) -> bool {
        self.pending_reveal
    }

    /// Whether anything is left to show, either already fetched or still remote.
    /// Once false, the list is finished for the session.
    pub fn has_more(&self, store: &RecordStore<R>) -> bool {
        self.revealed < store.len() || !store.is_exhausted()
    }

    /// Whether the sentinel trigger should be armed.
    pub fn is_armed(&self, store: &RecordStore<R>) -> bool {
        self.has_more(store) && !store.is_fetching()
    }

    /// Reveals the first increment when the window is empty and the store is not.
    pub fn seed(&mut self, store: &RecordStore<R>) -> usize {
        if !self.displayed.is_empty() {
            return 0;
        }
        self.reveal_next(store)
    }

    /// Handles the sentinel becoming visible.
    ///
    /// When at most `load_more_threshold` fetched records are left to reveal and
    /// the upstream is not exhausted, the next remote page is claimed and the
    /// reveal is deferred until [`complete_reveal`](Self::complete_reveal).
    /// Otherwise the next increment is revealed immediately.
    pub fn reveal_more(&mut self, store: &mut RecordStore<R>) -> RevealStep {
        if !self.is_armed(store) {
            return RevealStep::Idle;
        }

        let remaining = store.len().saturating_sub(self.revealed);
        if remaining <= self.load_more_threshold && !store.is_exhausted() {
            if let Some(request) = store.begin_request() {
                tracing::debug!(
                    remaining,
                    remote_page = request.page,
                    "fetching before reveal"
                );
                self.pending_reveal = true;
                return RevealStep::Fetch(request);
            }
        }

        if self.revealed >= store.len() {
            return RevealStep::Idle;
        }
        RevealStep::Revealed(self.reveal_next(store))
    }

    /// Finishes a reveal that was waiting on a remote page. Returns the number
    /// of records newly displayed.
    pub fn complete_reveal(&mut self, store: &RecordStore<R>) -> usize {
        if !self.pending_reveal {
            return 0;
        }
        self.pending_reveal = false;
        self.reveal_next(store)
    }

    /// Forgets a deferred reveal whose window is no longer on screen.
    pub fn cancel_pending(&mut self) {
        self.pending_reveal = false;
    }

    /// Empties the window and returns the cursor to the start of the store.
    pub fn reset(&mut self) {
        self.displayed.clear();
        self.displayed_ids.clear();
        self.revealed = 0;
        self.pending_reveal = false;
    }

    /// Takes the next increment from the store starting at the cursor. The
    /// cursor moves past the whole increment even when some of it was already
    /// displayed, so every call makes progress.
    fn reveal_next(&mut self, store: &RecordStore<R>) -> usize {
        let len = store.len();
        if self.revealed >= len {
            return 0;
        }
        let end = (self.revealed + self.page_size).min(len);
        let before = self.displayed.len();
        for record in &store.records()[self.revealed..end] {
            if self.displayed_ids.insert(record.id()) {
                self.displayed.push(record.clone());
            }
        }
        self.revealed = end;
        self.displayed.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::testing::{ids, items, Item};

    fn store_with(n: u64) -> RecordStore<Item> {
        let mut store = RecordStore::new();
        store.append(items(0..n));
        store
    }

    #[test]
    fn test_seed_reveals_first_increment() {
        let store = store_with(25);
        let mut window = InfiniteWindow::new(10, 5);
        assert_eq!(window.seed(&store), 10);
        assert_eq!(window.revealed_count(), 10);
        assert_eq!(window.seed(&store), 0);
        assert_eq!(ids(window.visible_slice()), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_reveal_without_fetch_when_plenty_remaining() {
        let mut store = store_with(40);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        assert_eq!(window.reveal_more(&mut store), RevealStep::Revealed(10));
        assert_eq!(window.revealed_count(), 20);
        assert!(!store.is_fetching());
    }

    #[test]
    fn test_low_remaining_fetches_before_reveal() {
        // 12 records, 10 revealed: 2 remaining <= 5, so fetch first.
        let mut store = store_with(12);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);

        let RevealStep::Fetch(request) = window.reveal_more(&mut store) else {
            panic!("expected a fetch before revealing");
        };
        assert_eq!(window.revealed_count(), 10);
        assert!(window.is_pending());

        store.complete_request(request, Ok(items(12..30)));
        assert_eq!(window.complete_reveal(&store), 10);
        assert_eq!(window.revealed_count(), 20);
        assert_eq!(ids(window.visible_slice()), (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_reveal_is_idle_while_fetching() {
        let mut store = store_with(12);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        let _pending = store.begin_request().unwrap();
        assert_eq!(window.reveal_more(&mut store), RevealStep::Idle);
        assert_eq!(window.revealed_count(), 10);
    }

    #[test]
    fn test_terminal_window_is_idempotent() {
        let mut store = store_with(8);
        let request = store.begin_request().unwrap();
        store.complete_request(request, Ok(Vec::new()));

        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        assert!(!window.has_more(&store));

        for _ in 0..3 {
            assert_eq!(window.reveal_more(&mut store), RevealStep::Idle);
        }
        assert_eq!(window.revealed_count(), 8);
        assert!(!store.is_fetching());
    }

    #[test]
    fn test_exhausted_store_still_reveals_remaining_records() {
        let mut store = store_with(25);
        let request = store.begin_request().unwrap();
        store.complete_request(request, Err(SourceError::Transport("down".into())));

        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        assert_eq!(window.reveal_more(&mut store), RevealStep::Revealed(10));
        assert_eq!(window.reveal_more(&mut store), RevealStep::Revealed(5));
        assert!(!window.has_more(&store));
        assert_eq!(window.reveal_more(&mut store), RevealStep::Idle);
    }

    #[test]
    fn test_cursor_advances_past_already_displayed_records() {
        let mut store = store_with(30);
        let mut window = InfiniteWindow::new(10, 0);
        window.seed(&store);
        // Simulate the displayed list already holding part of the next increment.
        window.displayed_ids.insert(12);
        window.displayed_ids.insert(13);

        assert_eq!(window.reveal_more(&mut store), RevealStep::Revealed(8));
        assert_eq!(window.revealed_count(), 20);
        assert!(!window.visible_slice().iter().any(|r| r.0 == 12));
    }

    #[test]
    fn test_fetch_with_nothing_new_still_reveals_tail() {
        let mut store = store_with(12);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);

        let RevealStep::Fetch(request) = window.reveal_more(&mut store) else {
            panic!("expected fetch");
        };
        store.complete_request(request, Ok(Vec::new()));
        assert_eq!(window.complete_reveal(&store), 2);
        assert!(!window.has_more(&store));
    }

    #[test]
    fn test_cancel_pending_drops_continuation() {
        let mut store = store_with(3);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        let RevealStep::Fetch(request) = window.reveal_more(&mut store) else {
            panic!("expected fetch");
        };
        window.cancel_pending();
        store.complete_request(request, Ok(items(3..20)));
        assert_eq!(window.complete_reveal(&store), 0);
        assert_eq!(window.revealed_count(), 3);
    }

    #[test]
    fn test_reset_clears_progress() {
        let store = store_with(20);
        let mut window = InfiniteWindow::new(10, 5);
        window.seed(&store);
        window.reset();
        assert!(window.is_empty());
        assert_eq!(window.revealed_count(), 0);
    }
}
