//! The approximate index: lazy group loading, bounded eviction and
//! ceiling search over the loaded entries.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::{IndexConfig, RecencyPolicy};
use crate::error::{IndexError, LoadStage};
use crate::index::groups::GroupCache;
use crate::index::provider::GroupProvider;
use crate::index::recency::RecencyRing;
use crate::index::search;

/// Snapshot of index activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Finds answered from an already-loaded group.
    pub hits: u64,
    /// Finds that had to load their group from the provider.
    pub misses: u64,
    /// Groups dropped to stay within capacity.
    pub evictions: u64,
    /// Finds with no entry at or after the key.
    pub not_found: u64,
    /// Provider failures while loading a group.
    pub load_failures: u64,
    /// Groups currently held in memory.
    pub cached_groups: usize,
    /// Entries currently held in memory, across all groups.
    pub cached_entries: usize,
}

#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    evictions: u64,
    not_found: u64,
    load_failures: u64,
}

/// Finds the entry nearest to a key over a data set loaded one group at a time.
///
/// Groups are loaded on first access and kept until capacity forces them
/// out. Under [`RecencyPolicy::OnLoad`] (the default) eviction order is age
/// since load: a cache hit does not refresh a group's position.
///
/// Not synchronized; wrap in [`SharedIndex`] to share across tasks.
pub struct ApproximateIndex<P: GroupProvider> {
    provider: P,
    groups: GroupCache<P::GroupId, P::Entry>,
    recency: RecencyRing<P::GroupId>,
    policy: RecencyPolicy,
    counters: Counters,
}

impl<P: GroupProvider> ApproximateIndex<P> {
    /// Create an index holding at most `max_groups` groups (0 = never evict).
    pub fn new(provider: P, max_groups: usize) -> Self {
        Self {
            provider,
            groups: GroupCache::new(),
            recency: RecencyRing::new(max_groups),
            policy: RecencyPolicy::OnLoad,
            counters: Counters::default(),
        }
    }

    pub fn with_config(provider: P, config: &IndexConfig) -> Self {
        Self::new(provider, config.max_groups).with_policy(config.recency)
    }

    pub fn with_policy(mut self, policy: RecencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the entry with the smallest key `>= key` within the group
    /// owning `key`, loading that group first if needed.
    ///
    /// A failed load leaves the cached groups and the recency list exactly
    /// as they were.
    pub fn find(&mut self, key: &P::Key) -> Result<&P::Entry, IndexError<P::Error>> {
        let group = self.provider.group(key);
        debug!(key = ?key, group = ?group, "Resolved key to a group");

        let provider = &self.provider;
        let eq = |a: &P::GroupId, b: &P::GroupId| provider.group_ids_equal(a, b);

        let slot = match self.groups.find(&group, eq) {
            Some(slot) => {
                self.counters.hits += 1;
                if self.policy == RecencyPolicy::OnAccess {
                    self.recency.promote(&group, eq);
                }
                debug!(key = ?key, group = ?group, "Data already available");
                slot
            }
            None => self.load(group)?,
        };

        let found = search::ceiling(&self.groups.at(slot).entries, key);
        match found {
            Some(pos) => Ok(&self.groups.at(slot).entries[pos]),
            None => {
                self.counters.not_found += 1;
                let group = format!("{:?}", self.groups.at(slot).id);
                debug!(key = ?key, group = %group, "No entry at or after key");
                Err(IndexError::NotFound {
                    key: format!("{key:?}"),
                    group,
                })
            }
        }
    }

    /// Load a group, register it as most recent and evict whatever ages out.
    /// Returns the group's slot in the cache.
    fn load(&mut self, group: P::GroupId) -> Result<usize, IndexError<P::Error>> {
        self.counters.misses += 1;
        let description = self.provider.describe();
        debug!(provider = %description, group = ?group, "Fault, loading group");

        let (from, to) = match self.provider.group_range(&group) {
            Ok(range) => range,
            Err(source) => return Err(self.load_failed(description, &group, LoadStage::Range, source)),
        };

        debug!(provider = %description, group = ?group, from = ?from, to = ?to, "Loading data");

        let entries = match self.provider.read_entries(&from, &to) {
            Ok(entries) => entries,
            Err(source) => return Err(self.load_failed(description, &group, LoadStage::Read, source)),
        };

        debug!(provider = %description, group = ?group, count = entries.len(), "Records returned");

        let provider = &self.provider;
        let eq = |a: &P::GroupId, b: &P::GroupId| provider.group_ids_equal(a, b);

        if let Some(evicted) = self.recency.push_front(group.clone()) {
            // The id aging out is the one being loaded: keep its entries.
            if !eq(&evicted, &group) {
                debug!(provider = %description, group = ?evicted, "Forgetting group");
                self.groups.remove(&evicted, eq);
                self.counters.evictions += 1;
            }
        }

        Ok(self.groups.insert(group, entries, eq))
    }

    fn load_failed(
        &mut self,
        provider: String,
        group: &P::GroupId,
        stage: LoadStage,
        source: P::Error,
    ) -> IndexError<P::Error> {
        self.counters.load_failures += 1;
        warn!(provider = %provider, group = ?group, %stage, error = %source, "Group load failed");
        IndexError::LoadFailure {
            provider,
            group: format!("{group:?}"),
            stage,
            source,
        }
    }

    /// Whether the group owning `key` is loaded. Never touches the provider's data.
    pub fn is_cached(&self, key: &P::Key) -> bool {
        let group = self.provider.group(key);
        self.groups
            .contains(&group, |a, b| self.provider.group_ids_equal(a, b))
    }

    /// Drop every loaded group and reset the recency list.
    pub fn clear(&mut self) {
        debug!(groups = self.groups.len(), "Clearing index");
        self.groups.clear();
        self.recency.clear();
    }

    pub fn cached_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn cached_entry_count(&self) -> usize {
        self.groups.entry_count()
    }

    /// Ids of the loaded groups, in no particular order.
    pub fn cached_group_ids(&self) -> Vec<P::GroupId> {
        self.groups.ids().cloned().collect()
    }

    /// Recency list, most recent first. Empty when eviction is disabled.
    pub fn recency(&self) -> Vec<P::GroupId> {
        self.recency.iter().cloned().collect()
    }

    pub fn max_groups(&self) -> usize {
        self.recency.capacity()
    }

    pub fn policy(&self) -> RecencyPolicy {
        self.policy
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            not_found: self.counters.not_found,
            load_failures: self.counters.load_failures,
            cached_groups: self.groups.len(),
            cached_entries: self.groups.entry_count(),
        }
    }
}

/// Index behind a single writer lock.
pub type SharedIndex<P> = Arc<RwLock<ApproximateIndex<P>>>;

/// Create a lock-wrapped index.
pub fn new_shared_index<P: GroupProvider>(provider: P, config: &IndexConfig) -> SharedIndex<P> {
    Arc::new(RwLock::new(ApproximateIndex::with_config(provider, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::provider::IndexEntry;

    #[derive(Debug, Clone, PartialEq)]
    struct Tick(i64);

    impl IndexEntry for Tick {
        type Key = i64;

        fn key(&self) -> i64 {
            self.0
        }
    }

    /// Groups of ten keys; every multiple of ten present.
    struct Tens;

    impl GroupProvider for Tens {
        type Key = i64;
        type Entry = Tick;
        type GroupId = i64;
        type Error = std::io::Error;

        fn read_entries(&self, from: &i64, to: &i64) -> Result<Vec<Tick>, std::io::Error> {
            Ok((*from..*to).filter(|k| k % 5 == 0).map(Tick).collect())
        }

        fn group(&self, key: &i64) -> i64 {
            key.div_euclid(10)
        }

        fn group_range(&self, group: &i64) -> Result<(i64, i64), std::io::Error> {
            Ok((group * 10, group * 10 + 10))
        }

        fn group_ids_equal(&self, a: &i64, b: &i64) -> bool {
            a == b
        }

        fn describe(&self) -> String {
            "tens".to_string()
        }
    }

    #[test]
    fn test_find_loads_then_hits() {
        let mut index = ApproximateIndex::new(Tens, 4);

        assert_eq!(index.find(&3).unwrap(), &Tick(5));
        assert_eq!(index.find(&5).unwrap(), &Tick(5));

        let stats = index.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.cached_groups, 1);
        assert_eq!(stats.cached_entries, 2);
    }

    #[test]
    fn test_find_past_group_end_is_not_found() {
        let mut index = ApproximateIndex::new(Tens, 4);
        let err = index.find(&7).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(index.stats().not_found, 1);
        // The group is still loaded.
        assert!(index.is_cached(&1));
    }

    #[test]
    fn test_on_access_policy_promotes_hits() {
        let config = IndexConfig {
            max_groups: 2,
            recency: RecencyPolicy::OnAccess,
        };
        let mut index = ApproximateIndex::with_config(Tens, &config);

        index.find(&0).unwrap();
        index.find(&10).unwrap();
        index.find(&0).unwrap();
        index.find(&20).unwrap();

        // Group 1 was least recently accessed.
        assert!(index.is_cached(&0));
        assert!(!index.is_cached(&10));
        assert_eq!(index.recency(), vec![2, 0]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut index = ApproximateIndex::new(Tens, 4);
        index.find(&0).unwrap();
        index.find(&10).unwrap();

        index.clear();
        assert_eq!(index.cached_group_count(), 0);
        assert!(index.recency().is_empty());
    }
}
