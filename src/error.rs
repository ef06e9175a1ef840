//! Errors surfaced by the index.

use std::fmt;

use thiserror::Error;

/// Which provider call failed while loading a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Resolving the group's `[from, to)` range.
    Range,
    /// Reading the group's entries.
    Read,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Range => write!(f, "range resolution"),
            LoadStage::Read => write!(f, "entry read"),
        }
    }
}

#[derive(Error, Debug)]
pub enum IndexError<E> {
    /// No entry at or after the key within its group. Expected outcome.
    #[error("no entry at or after key {key} in group {group}")]
    NotFound { key: String, group: String },

    /// The provider failed to load the owning group. Not retried.
    #[error("failed to load group {group} from [{provider}] during {stage}: {source}")]
    LoadFailure {
        provider: String,
        group: String,
        stage: LoadStage,
        #[source]
        source: E,
    },
}

impl<E> IndexError<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }

    pub fn is_load_failure(&self) -> bool {
        matches!(self, IndexError::LoadFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err: IndexError<std::io::Error> = IndexError::NotFound {
            key: "31".to_string(),
            group: "BucketId(0)".to_string(),
        };
        assert_eq!(err.to_string(), "no entry at or after key 31 in group BucketId(0)");
        assert!(err.is_not_found());
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_load_failure_keeps_source() {
        let err = IndexError::LoadFailure {
            provider: "memory".to_string(),
            group: "7".to_string(),
            stage: LoadStage::Read,
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk gone"),
        };
        assert!(err.to_string().contains("entry read"));
        assert!(err.to_string().contains("disk gone"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
