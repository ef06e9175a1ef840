//! Stock providers for integer-keyed data.
//!
//! Both partition the key space into fixed-width buckets (see
//! [`bucketing`]) and serve [`Record`] entries:
//! - [`memory`]: a sorted in-memory record set
//! - [`json_lines`]: a JSON-lines file re-read on every group load

pub mod bucketing;
pub mod json_lines;
pub mod memory;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::IndexEntry;

pub use bucketing::{BucketId, Bucketing};
pub use json_lines::JsonLinesProvider;
pub use memory::MemoryProvider;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record at {}:{line}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("key range of {bucket} overflows i64")]
    RangeOverflow { bucket: BucketId },

    #[error("group width must be positive, got {0}")]
    InvalidWidth(i64),
}

/// A keyed record with an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Sort key, e.g. an epoch-second timestamp.
    pub key: i64,

    #[serde(default)]
    pub value: serde_json::Value,
}

impl Record {
    pub fn new(key: i64, value: serde_json::Value) -> Self {
        Self { key, value }
    }
}

impl IndexEntry for Record {
    type Key = i64;

    fn key(&self) -> i64 {
        self.key
    }
}
