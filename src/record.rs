//! Identity for catalog records.
//!
//! The loading coordinator never looks inside a record. It only needs a stable
//! identifier to deduplicate overlapping remote pages and to track which
//! records the infinite list has already shown.

/// Stable unique identifier of a record as assigned by the upstream source.
pub type RecordId = u64;

/// Trait for anything the record store can hold.
///
/// # Examples
///
/// ```rust
/// use show_explorer::record::{Record, RecordId};
///
/// #[derive(Clone)]
/// struct Episode {
///     id: RecordId,
///     title: String,
/// }
///
/// impl Record for Episode {
///     fn id(&self) -> RecordId {
///         self.id
///     }
/// }
/// ```
pub trait Record {
    /// Returns the record's identifier. Two records with the same id are the
    /// same record, whatever their other fields say.
    fn id(&self) -> RecordId;
}
