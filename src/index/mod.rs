//! Approximate group-indexed lookup.
//!
//! - [`provider`]: `IndexEntry` and `GroupProvider`, the data-access contract
//! - [`groups`]: cache of loaded groups keyed by provider-defined equality
//! - [`recency`]: bounded most-recently-used ring driving eviction
//! - [`search`]: ceiling search within one group
//! - [`approximate`]: `ApproximateIndex`, which ties the above together

pub mod approximate;
pub mod groups;
pub mod provider;
pub mod recency;
pub mod search;

pub use approximate::{new_shared_index, ApproximateIndex, IndexStats, SharedIndex};
pub use provider::{GroupProvider, IndexEntry};
