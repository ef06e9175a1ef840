//! Provider contract: the data-access side of the index.
//!
//! A provider partitions the ordered key space into contiguous groups and
//! reads the raw entries of one group on demand. It holds no caching logic.

use std::fmt::Debug;

/// A record the index can search. Exposes exactly one thing: its key.
pub trait IndexEntry {
    type Key: Ord + Clone + Debug;

    /// The key this entry is sorted and searched by (e.g. a timestamp).
    fn key(&self) -> Self::Key;
}

/// Pluggable data source consumed by [`ApproximateIndex`](super::ApproximateIndex).
///
/// Contracts the index relies on:
/// - `group` is total and stable: the same key always maps to the same group.
/// - `group_range(group(k))` returns `[from, to)` with `from <= k < to`.
/// - `read_entries(from, to)` returns every entry in `[from, to)`, ascending.
///
/// Group ids are never compared with `==`; the index only ever asks
/// [`group_ids_equal`](GroupProvider::group_ids_equal).
pub trait GroupProvider {
    type Key: Ord + Clone + Debug;
    type Entry: IndexEntry<Key = Self::Key>;
    type GroupId: Clone + Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return all entries with a key in `[from, to)`, ascending by key.
    fn read_entries(&self, from: &Self::Key, to: &Self::Key) -> Result<Vec<Self::Entry>, Self::Error>;

    /// Map a key to the id of the group that owns it.
    fn group(&self, key: &Self::Key) -> Self::GroupId;

    /// Return the half-open key range `[from, to)` owned by a group.
    fn group_range(&self, group: &Self::GroupId) -> Result<(Self::Key, Self::Key), Self::Error>;

    /// Provider-defined group id equality.
    fn group_ids_equal(&self, a: &Self::GroupId, b: &Self::GroupId) -> bool;

    /// Human-readable identity, used only in diagnostics.
    fn describe(&self) -> String;
}
