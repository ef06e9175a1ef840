//! Ordered search within one loaded group.

use crate::index::provider::IndexEntry;

/// Ceiling search: position of the first entry whose key is `>= key`.
///
/// `entries` must be ascending by key. Returns `None` when every key in
/// the slice is smaller than `key` (or the slice is empty).
pub fn ceiling<E: IndexEntry>(entries: &[E], key: &E::Key) -> Option<usize> {
    let pos = entries.partition_point(|e| e.key() < *key);
    if pos == entries.len() {
        None
    } else {
        Some(pos)
    }
}
