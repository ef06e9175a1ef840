//! Provider over an in-memory record set.

use crate::index::GroupProvider;
use crate::providers::{BucketId, Bucketing, ProviderError, Record};

/// Serves records held in memory, sorted on construction.
pub struct MemoryProvider {
    records: Vec<Record>,
    bucketing: Bucketing,
    name: String,
}

impl MemoryProvider {
    pub fn new(records: impl IntoIterator<Item = Record>, bucketing: Bucketing) -> Self {
        let mut records: Vec<Record> = records.into_iter().collect();
        records.sort_by_key(|r| r.key);
        Self {
            records,
            bucketing,
            name: "memory".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bucketing(&self) -> Bucketing {
        self.bucketing
    }
}

impl GroupProvider for MemoryProvider {
    type Key = i64;
    type Entry = Record;
    type GroupId = BucketId;
    type Error = ProviderError;

    fn read_entries(&self, from: &i64, to: &i64) -> Result<Vec<Record>, ProviderError> {
        let lo = self.records.partition_point(|r| r.key < *from);
        let hi = self.records.partition_point(|r| r.key < *to);
        if lo >= hi {
            return Ok(Vec::new());
        }
        Ok(self.records[lo..hi].to_vec())
    }

    fn group(&self, key: &i64) -> BucketId {
        self.bucketing.group(*key)
    }

    fn group_range(&self, group: &BucketId) -> Result<(i64, i64), ProviderError> {
        self.bucketing.range(*group)
    }

    fn group_ids_equal(&self, a: &BucketId, b: &BucketId) -> bool {
        a.0 == b.0
    }

    fn describe(&self) -> String {
        format!(
            "{} ({} records, width {})",
            self.name,
            self.records.len(),
            self.bucketing.width()
        )
    }
}
