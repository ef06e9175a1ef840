//! Fixed-width partitioning of the `i64` key space.

use std::fmt;

use serde::Serialize;

use crate::providers::ProviderError;

/// Id of one fixed-width bucket: `floor(key / width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BucketId(pub i64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bucket {}", self.0)
    }
}

/// Splits keys into buckets `[n * width, (n + 1) * width)`.
///
/// Uses Euclidean division, so `-1` lands in bucket `-1` rather than `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucketing {
    width: i64,
}

impl Bucketing {
    pub fn new(width: i64) -> Result<Self, ProviderError> {
        if width <= 0 {
            return Err(ProviderError::InvalidWidth(width));
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn group(&self, key: i64) -> BucketId {
        BucketId(key.div_euclid(self.width))
    }

    /// Half-open key range owned by `bucket`.
    ///
    /// Fails for the topmost bucket when its exclusive end is past `i64::MAX`.
    pub fn range(&self, bucket: BucketId) -> Result<(i64, i64), ProviderError> {
        let from = bucket
            .0
            .checked_mul(self.width)
            .ok_or(ProviderError::RangeOverflow { bucket })?;
        let to = from
            .checked_add(self.width)
            .ok_or(ProviderError::RangeOverflow { bucket })?;
        Ok((from, to))
    }
}
