//! Cache of loaded groups.
//!
//! Group ids carry no native equality, so lookups go through the
//! provider-supplied comparison passed in by the caller. The number of
//! resident groups is bounded by the recency capacity, which keeps the
//! scan short.

/// One group's entries, ascending by key.
#[derive(Debug, Clone)]
pub struct LoadedGroup<G, E> {
    pub id: G,
    pub entries: Vec<E>,
}

/// Mapping from group id to its loaded entries.
#[derive(Debug, Clone)]
pub struct GroupCache<G, E> {
    groups: Vec<LoadedGroup<G, E>>,
}

impl<G, E> Default for GroupCache<G, E> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<G, E> GroupCache<G, E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &G, eq: impl Fn(&G, &G) -> bool) -> Option<usize> {
        self.groups.iter().position(|g| eq(&g.id, id))
    }

    pub fn get(&self, id: &G, eq: impl Fn(&G, &G) -> bool) -> Option<&LoadedGroup<G, E>> {
        self.position(id, eq).map(|i| &self.groups[i])
    }

    pub fn contains(&self, id: &G, eq: impl Fn(&G, &G) -> bool) -> bool {
        self.position(id, eq).is_some()
    }

    /// Insert a group, replacing any existing group with an equal id.
    /// Returns the index of the stored group.
    pub fn insert(&mut self, id: G, entries: Vec<E>, eq: impl Fn(&G, &G) -> bool) -> usize {
        match self.position(&id, eq) {
            Some(i) => {
                self.groups[i] = LoadedGroup { id, entries };
                i
            }
            None => {
                self.groups.push(LoadedGroup { id, entries });
                self.groups.len() - 1
            }
        }
    }

    pub fn remove(&mut self, id: &G, eq: impl Fn(&G, &G) -> bool) -> Option<LoadedGroup<G, E>> {
        self.position(id, eq).map(|i| self.groups.swap_remove(i))
    }

    /// Group at a position previously returned by [`insert`](Self::insert)
    /// or [`find`](Self::find).
    pub fn at(&self, index: usize) -> &LoadedGroup<G, E> {
        &self.groups[index]
    }

    pub fn find(&self, id: &G, eq: impl Fn(&G, &G) -> bool) -> Option<usize> {
        self.position(id, eq)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &G> {
        self.groups.iter().map(|g| &g.id)
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(a: &u32, b: &u32) -> bool {
        a == b
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = GroupCache::new();
        cache.insert(1u32, vec!["a", "b"], eq);
        cache.insert(2u32, vec!["c"], eq);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.entry_count(), 3);
        assert_eq!(cache.get(&1, eq).map(|g| g.entries.len()), Some(2));
        assert!(cache.get(&3, eq).is_none());
    }

    #[test]
    fn test_insert_replaces_equal_id() {
        let mut cache = GroupCache::new();
        cache.insert(1u32, vec!["a"], eq);
        cache.insert(1u32, vec!["x", "y"], eq);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1, eq).map(|g| g.entries.clone()), Some(vec!["x", "y"]));
    }

    #[test]
    fn test_remove() {
        let mut cache = GroupCache::new();
        cache.insert(1u32, vec!["a"], eq);
        cache.insert(2u32, vec!["b"], eq);

        let removed = cache.remove(&1, eq).map(|g| g.id);
        assert_eq!(removed, Some(1));
        assert!(!cache.contains(&1, eq));
        assert!(cache.contains(&2, eq));
        assert!(cache.remove(&1, eq).is_none());
    }

    #[test]
    fn test_custom_equality() {
        // Ids compared by bucket of ten, not by value.
        let by_tens = |a: &u32, b: &u32| a / 10 == b / 10;

        let mut cache = GroupCache::new();
        cache.insert(12u32, vec!["a"], by_tens);
        assert!(cache.contains(&19, by_tens));
        assert!(!cache.contains(&20, by_tens));
    }
}
