//! Recency list over loaded groups, most recent first.
//!
//! Backed by a ring buffer sized to the group capacity, so registering a
//! load and aging out the oldest group are both O(1). A capacity of zero
//! disables the list entirely.

use std::collections::VecDeque;

/// Bounded most-recently-used list of group ids.
#[derive(Debug, Clone)]
pub struct RecencyRing<G> {
    slots: VecDeque<G>,
    capacity: usize,
}

impl<G> RecencyRing<G> {
    /// Create a ring holding at most `capacity` ids (0 = disabled).
    pub fn new(capacity: usize) -> Self {
        // One spare slot: the list briefly holds capacity + 1 ids before the
        // oldest is popped.
        let reserve = if capacity == 0 { 0 } else { capacity + 1 };
        Self {
            slots: VecDeque::with_capacity(reserve),
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Register `group` as most recent.
    ///
    /// Returns the id that aged out past capacity, if any. Always `None`
    /// when the ring is disabled.
    pub fn push_front(&mut self, group: G) -> Option<G> {
        if !self.is_enabled() {
            return None;
        }

        self.slots.push_front(group);
        if self.slots.len() > self.capacity {
            self.slots.pop_back()
        } else {
            None
        }
    }

    /// Move `group` to the front if present. Returns whether it was found.
    pub fn promote(&mut self, group: &G, eq: impl Fn(&G, &G) -> bool) -> bool {
        let Some(pos) = self.slots.iter().position(|g| eq(g, group)) else {
            return false;
        };
        if pos > 0 {
            if let Some(g) = self.slots.remove(pos) {
                self.slots.push_front(g);
            }
        }
        true
    }

    /// Ids from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.slots.iter()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
