//! The record store: every record fetched so far, deduplicated, in arrival order.
//!
//! The store owns the remote paging state as well: the next remote page to ask
//! for, whether the upstream is exhausted, and whether a request is currently
//! in flight. Requests are split in two phases so an event loop can hold the
//! store while the network call is pending:
//!
//! 1. [`RecordStore::begin_request`] claims the single in-flight slot and hands
//!    back a [`PageRequest`].
//! 2. [`RecordStore::complete_request`] applies whatever the source returned.
//!
//! [`RecordStore::request_next_page`] runs both phases against a
//! [`PageSource`] for callers that can simply await.
//!
//! # Examples
//!
//! ```rust
//! use show_explorer::record::{Record, RecordId};
//! use show_explorer::store::{FetchOutcome, RecordStore};
//!
//! #[derive(Clone)]
//! struct Item(RecordId);
//! impl Record for Item {
//!     fn id(&self) -> RecordId { self.0 }
//! }
//!
//! let mut store = RecordStore::new();
//! let request = store.begin_request().unwrap();
//! assert!(store.begin_request().is_none()); // one request at a time
//!
//! let outcome = store.complete_request(request, Ok(vec![Item(1), Item(2), Item(1)]));
//! assert_eq!(outcome, FetchOutcome::Appended { page: 0, received: 3, added: 2 });
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.next_remote_page(), 1);
//! ```

use crate::record::{Record, RecordId};
use crate::source::{PageSource, SourceError};
use std::collections::HashSet;

/// A claimed remote request. Returned by [`RecordStore::begin_request`] and
/// handed back to [`RecordStore::complete_request`] with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Remote page index to fetch.
    pub page: usize,
    generation: u64,
    epoch: u64,
}

/// What a finished request did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A non-empty batch arrived; `added` of its `received` records were new.
    Appended {
        /// Remote page index.
        page: usize,
        /// Records in the batch.
        received: usize,
        /// Records not already in the store.
        added: usize,
    },
    /// The page came back empty. The upstream is exhausted.
    Exhausted {
        /// Remote page index.
        page: usize,
    },
    /// The fetch failed. Treated as the end of remote data.
    Failed {
        /// Remote page index.
        page: usize,
        /// What the source reported.
        error: SourceError,
    },
    /// Nothing was requested or the result belonged to a store that has since
    /// been reset.
    Ignored,
}

/// Deduplicated, append-only collection of fetched records plus remote paging state.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    ids: HashSet<RecordId>,
    next_remote_page: usize,
    remote_exhausted: bool,
    in_flight: Option<usize>,
    generation: u64,
    /// Bumped by `rewind_remote`; results requested before a rewind keep
    /// their records but leave the paging state alone.
    epoch: u64,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
            next_remote_page: 0,
            remote_exhausted: false,
            in_flight: None,
            generation: 0,
            epoch: 0,
        }
    }
}

impl<R: Record> RecordStore<R> {
    /// An empty store that will start at remote page 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True until the first record arrives.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Record at `index` in arrival order.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    /// Whether a record with `id` is held.
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// The remote page the next request will ask for.
    pub fn next_remote_page(&self) -> usize {
        self.next_remote_page
    }

    /// True once the upstream returned an empty page or failed.
    pub fn is_exhausted(&self) -> bool {
        self.remote_exhausted
    }

    /// True while a request is in flight.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Appends the records whose id is not already present, keeping their
    /// relative order. Duplicates inside `records` itself are dropped as well.
    ///
    /// Returns the number of records added.
    pub fn append<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = R>,
    {
        let before = self.records.len();
        for record in records {
            if self.ids.insert(record.id()) {
                self.records.push(record);
            }
        }
        self.records.len() - before
    }

    /// Claims the in-flight slot for page `next_remote_page`.
    ///
    /// Returns `None` when a request is already outstanding or the upstream is
    /// exhausted; repeated triggers while a fetch is pending are dropped here.
    pub fn begin_request(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.remote_exhausted {
            return None;
        }
        let page = self.next_remote_page;
        self.in_flight = Some(page);
        tracing::debug!(page, "remote page requested");
        Some(PageRequest {
            page,
            generation: self.generation,
            epoch: self.epoch,
        })
    }

    /// Applies the result of a request started with [`begin_request`].
    ///
    /// [`begin_request`]: RecordStore::begin_request
    pub fn complete_request(
        &mut self,
        request: PageRequest,
        result: Result<Vec<R>, SourceError>,
    ) -> FetchOutcome {
        if request.generation != self.generation {
            tracing::debug!(page = request.page, "dropping result for a reset store");
            return FetchOutcome::Ignored;
        }
        if self.in_flight == Some(request.page) {
            self.in_flight = None;
        }

        let page = request.page;
        let current = request.epoch == self.epoch;
        if !current {
            tracing::debug!(page, "result predates a rewind; paging state kept");
        }
        match result {
            Ok(batch) if batch.is_empty() => {
                tracing::debug!(page, "remote source exhausted");
                if current {
                    self.remote_exhausted = true;
                }
                FetchOutcome::Exhausted { page }
            }
            Ok(batch) => {
                let received = batch.len();
                let added = self.append(batch);
                if current {
                    self.next_remote_page = self.next_remote_page.max(page + 1);
                }
                tracing::debug!(page, received, added, total = self.len(), "remote page applied");
                FetchOutcome::Appended {
                    page,
                    received,
                    added,
                }
            }
            Err(error) => {
                tracing::error!(page, %error, "failed to load remote page");
                if current {
                    self.remote_exhausted = true;
                }
                FetchOutcome::Failed { page, error }
            }
        }
    }

    /// Fetches the next remote page from `source` and applies it.
    ///
    /// Returns [`FetchOutcome::Ignored`] without touching the source when a
    /// request is already in flight or the upstream is exhausted.
    pub async fn request_next_page<S>(&mut self, source: &S) -> FetchOutcome
    where
        S: PageSource<R> + ?Sized,
    {
        let Some(request) = self.begin_request() else {
            return FetchOutcome::Ignored;
        };
        let result = source.fetch_page(request.page).await;
        self.complete_request(request, result)
    }

    /// Re-arms remote paging from page zero without discarding records.
    ///
    /// Already-held records are kept; refetched pages are deduplicated on
    /// arrival. A request still in flight completes normally and its records
    /// are kept, but it no longer moves the remote page counter or marks the
    /// store exhausted.
    pub fn rewind_remote(&mut self) {
        self.next_remote_page = 0;
        self.remote_exhausted = false;
        self.epoch += 1;
    }

    /// Empties the store and its paging state. Results of requests issued
    /// before the reset are ignored when they arrive.
    pub fn reset(&mut self) {
        self.records.clear();
        self.ids.clear();
        self.next_remote_page = 0;
        self.remote_exhausted = false;
        self.in_flight = None;
        self.generation += 1;
    }
}
