//! Shared fixtures for unit tests.

use crate::record::{Record, RecordId};
use crate::source::{PageSource, SourceError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item(pub RecordId);

impl Record for Item {
    fn id(&self) -> RecordId {
        self.0
    }
}

pub fn items(ids: Range<RecordId>) -> Vec<Item> {
    ids.map(Item).collect()
}

pub fn ids(records: &[Item]) -> Vec<RecordId> {
    records.iter().map(|r| r.0).collect()
}

/// A page source that serves canned pages and records every call.
/// Pages that were not scripted come back empty.
#[derive(Default)]
pub struct ScriptedSource {
    pages: HashMap<usize, Result<Vec<Item>, SourceError>>,
    calls: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: usize, records: Vec<Item>) -> Self {
        self.pages.insert(page, Ok(records));
        self
    }

    pub fn with_error(mut self, page: usize, error: SourceError) -> Self {
        self.pages.insert(page, Err(error));
        self
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource<Item> for ScriptedSource {
    async fn fetch_page(&self, page: usize) -> Result<Vec<Item>, SourceError> {
        self.calls.lock().unwrap().push(page);
        self.pages.get(&page).cloned().unwrap_or_else(|| Ok(Vec::new()))
    }
}
