//! Provider over a JSON-lines file.
//!
//! Each non-blank line is one `{"key": <i64>, "value": <any>}` record. The
//! file is scanned on every group load, so it may be appended to while the
//! index is running; groups already cached are not refreshed until evicted
//! or the index is cleared.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::index::GroupProvider;
use crate::providers::{BucketId, Bucketing, ProviderError, Record};

pub struct JsonLinesProvider {
    path: PathBuf,
    bucketing: Bucketing,
}

impl JsonLinesProvider {
    pub fn new(path: impl Into<PathBuf>, bucketing: Bucketing) -> Self {
        Self {
            path: path.into(),
            bucketing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ProviderError {
        ProviderError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GroupProvider for JsonLinesProvider {
    type Key = i64;
    type Entry = Record;
    type GroupId = BucketId;
    type Error = ProviderError;

    fn read_entries(&self, from: &i64, to: &i64) -> Result<Vec<Record>, ProviderError> {
        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;

        let mut scanned = 0usize;
        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            scanned += 1;

            let record: Record = serde_json::from_str(line).map_err(|source| ProviderError::Parse {
                path: self.path.clone(),
                line: i + 1,
                source,
            })?;
            if record.key >= *from && record.key < *to {
                records.push(record);
            }
        }

        // The file itself need not be ordered.
        records.sort_by_key(|r| r.key);

        debug!(
            path = %self.path.display(),
            from,
            to,
            scanned,
            matched = records.len(),
            "Scanned entry file"
        );

        Ok(records)
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
        format!("jsonl:{} (width {})", self.path.display(), self.bucketing.width())
    }
}
