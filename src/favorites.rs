//! Locally persisted favorites.
//!
//! The ledger is a set of record ids kept in insertion order. It is read once
//! at startup and written back in full, synchronously, after every toggle.
//! Persistence problems never reach the caller: a missing or unreadable file
//! loads as an empty set and failed writes are logged, leaving the in-memory
//! set authoritative for the rest of the session.

use crate::record::RecordId;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Failure to persist the favorites list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage could not be read or written.
    Io(String),
    /// No storage location is available.
    Unavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Unavailable => write!(f, "storage unavailable"),
        }
    }
}

impl std::error::Error for StorageError {}

/// A single slot holding the serialized favorites.
pub trait FavoritesStorage {
    /// The stored value, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored value.
    fn save(&mut self, value: &str) -> Result<(), StorageError>;
}

impl<S: FavoritesStorage + ?Sized> FavoritesStorage for Box<S> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, value: &str) -> Result<(), StorageError> {
        (**self).save(value)
    }
}

/// Stores favorites in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/show-explorer/favorites.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(crate::config::APP_DIR).join("favorites.json"))
    }

    /// Location of the favorites file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn save(&mut self, value: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        std::fs::write(&self.path, value).map_err(|e| StorageError::Io(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    value: Option<String>,
    writes: usize,
    failing: bool,
}

/// In-memory storage. Clones share the same slot, so a test can keep a handle
/// and inspect what the ledger wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut slot) = storage.slot.lock() {
            slot.value = Some(value.into());
        }
        storage
    }

    /// Makes every subsequent load and save fail.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.failing = failing;
        }
    }

    /// The stored JSON, if anything has been written.
    pub fn value(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.value.clone())
    }

    /// Number of save attempts so far, failed ones included.
    pub fn writes(&self) -> usize {
        self.slot.lock().map(|slot| slot.writes).unwrap_or(0)
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let slot = self.slot.lock().map_err(|_| StorageError::Unavailable)?;
        if slot.failing {
            return Err(StorageError::Unavailable);
        }
        Ok(slot.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().map_err(|_| StorageError::Unavailable)?;
        slot.writes += 1;
        if slot.failing {
            return Err(StorageError::Unavailable);
        }
        slot.value = Some(value.to_string());
        Ok(())
    }
}

/// The set of favorite record ids plus the storage it is persisted to.
#[derive(Debug)]
pub struct FavoritesLedger<S> {
    ids: Vec<RecordId>,
    storage: S,
}

impl<S: FavoritesStorage> FavoritesLedger<S> {
    /// Reads the persisted set. Missing, unreadable or corrupt data gives an
    /// empty ledger.
    pub fn load(storage: S) -> Self {
        let ids = match storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<RecordId>>(&raw) {
                Ok(mut ids) => {
                    let mut seen = std::collections::HashSet::new();
                    ids.retain(|id| seen.insert(*id));
                    ids
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring corrupt favorites data");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read favorites");
                Vec::new()
            }
        };
        Self { ids, storage }
    }

    /// Whether `id` is a favorite.
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Favorite ids in the order they were added.
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when there are no favorites.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The storage favorites are written to.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds `id` or removes it if present, then persists the whole set.
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        let now_favorite = match self.ids.iter().position(|&f| f == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };
        self.persist();
        now_favorite
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(|e| StorageError::Io(e.to_string()))
            .and_then(|raw| self.storage.save(&raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toggle_twice_restores_and_persists_twice() {
        let storage = MemoryStorage::with_value("[1,2]");
        let mut ledger = FavoritesLedger::load(storage.clone());

        assert!(ledger.toggle(5));
        assert_eq!(ledger.ids(), &[1, 2, 5]);
        assert_eq!(storage.value().as_deref(), Some("[1,2,5]"));

        assert!(!ledger.toggle(5));
        assert_eq!(ledger.ids(), &[1, 2]);
        assert_eq!(storage.value().as_deref(), Some("[1,2]"));
        assert_eq!(storage.writes(), 2);
    }

    #[test]
    fn test_missing_data_loads_empty() {
        let ledger = FavoritesLedger::load(MemoryStorage::new());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let ledger = FavoritesLedger::load(MemoryStorage::with_value("{not json"));
        assert!(ledger.is_empty());
        let ledger = FavoritesLedger::load(MemoryStorage::with_value(r#"["a","b"]"#));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_storage_are_collapsed() {
        let ledger = FavoritesLedger::load(MemoryStorage::with_value("[3,1,3]"));
        assert_eq!(ledger.ids(), &[3, 1]);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = MemoryStorage::new();
        let mut ledger = FavoritesLedger::load(storage.clone());
        storage.set_failing(true);

        assert!(ledger.toggle(7));
        assert!(ledger.contains(7));
        assert_eq!(storage.writes(), 1);
        assert_eq!(storage.value(), None);
    }

    #[test]
    fn test_unavailable_storage_loads_empty() {
        let storage = MemoryStorage::with_value("[1]");
        storage.set_failing(true);
        assert!(FavoritesLedger::load(storage).is_empty());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("favorites.json");

        let mut ledger = FavoritesLedger::load(JsonFileStorage::new(&path));
        assert!(ledger.is_empty());
        ledger.toggle(42);
        ledger.toggle(7);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[42,7]");
        let reloaded = FavoritesLedger::load(JsonFileStorage::new(&path));
        assert_eq!(reloaded.ids(), &[42, 7]);
    }

    #[test]
    fn test_boxed_storage() {
        let storage = MemoryStorage::new();
        let boxed: Box<dyn FavoritesStorage + Send> = Box::new(storage.clone());
        let mut ledger = FavoritesLedger::load(boxed);
        ledger.toggle(1);
        assert_eq!(storage.value().as_deref(), Some("[1]"));
    }
}
