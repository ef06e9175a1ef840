//! Prometheus exposition of index statistics.

use prometheus::{Encoder, IntGauge, Registry, TextEncoder};

use crate::index::IndexStats;

/// Gauges mirroring an [`IndexStats`] snapshot.
pub struct IndexMetrics {
    registry: Registry,
    hits: IntGauge,
    misses: IntGauge,
    evictions: IntGauge,
    not_found: IntGauge,
    load_failures: IntGauge,
    cached_groups: IntGauge,
    cached_entries: IntGauge,
}

impl IndexMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let gauge = |name: &str, help: &str| -> prometheus::Result<IntGauge> {
            let g = IntGauge::new(name, help)?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };

        let hits = gauge("group_index_hits", "Finds served from a loaded group")?;
        let misses = gauge("group_index_misses", "Finds that loaded their group")?;
        let evictions = gauge("group_index_evictions", "Groups evicted to stay within capacity")?;
        let not_found = gauge("group_index_not_found", "Finds with no entry at or after the key")?;
        let load_failures = gauge("group_index_load_failures", "Provider failures while loading a group")?;
        let cached_groups = gauge("group_index_cached_groups", "Groups currently in memory")?;
        let cached_entries = gauge("group_index_cached_entries", "Entries currently in memory")?;

        Ok(Self {
            registry,
            hits,
            misses,
            evictions,
            not_found,
            load_failures,
            cached_groups,
            cached_entries,
        })
    }

    /// Refresh every gauge from a stats snapshot.
    pub fn observe(&self, stats: &IndexStats) {
        self.hits.set(stats.hits as i64);
        self.misses.set(stats.misses as i64);
        self.evictions.set(stats.evictions as i64);
        self.not_found.set(stats.not_found as i64);
        self.load_failures.set(stats.load_failures as i64);
        self.cached_groups.set(stats.cached_groups as i64);
        self.cached_entries.set(stats.cached_entries as i64);
    }

    /// Render the registry in text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
