//! group-index: approximate lookup over a large ordered data set.
//!
//! The key space is split into contiguous groups by a pluggable
//! [`GroupProvider`](index::GroupProvider). Groups are loaded on first
//! access, kept in memory up to a configured count, and searched for the
//! first entry at or after the requested key.

pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod providers;
pub mod server;

pub use error::{IndexError, LoadStage};
pub use index::{ApproximateIndex, GroupProvider, IndexEntry, IndexStats, SharedIndex};
