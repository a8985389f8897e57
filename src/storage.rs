//! Node storage shared by the pointer-based structures
//!
//! Trees, rings and collision chains are built inside a [`slotmap::SlotMap`]
//! arena and address each other through [`NodeKey`]s instead of references.
//! A missing neighbour (no parent, no sibling, no child) is `None`; the
//! generational key keeps `Option<NodeKey>` the same size as the key itself.
//!
//! Indexed queues additionally keep an [`ElementIndex`], the reverse map from
//! an element to the slot (arena key or array position) currently holding
//! its record. Any operation that moves a record must move its index entry
//! in the same step, via [`ElementIndex::relocate`].

use rustc_hash::FxHashMap;
use slotmap::new_key_type;
use std::fmt;
use std::hash::Hash;

new_key_type! {
    /// Stable address of a node inside a structure's arena
    pub struct NodeKey;
}

/// Reverse index from element to the location of its live record
///
/// `L` is the location type: a [`NodeKey`] for arena structures or a `usize`
/// array position for the array heaps.
pub(crate) struct ElementIndex<E, L> {
    slots: FxHashMap<E, L>,
}

impl<E: Eq + Hash, L: Copy> ElementIndex<E, L> {
    pub(crate) fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
        }
    }

    #[inline]
    pub(crate) fn contains(&self, element: &E) -> bool {
        self.slots.contains_key(element)
    }

    #[inline]
    pub(crate) fn get(&self, element: &E) -> Option<L> {
        self.slots.get(element).copied()
    }

    /// Records a brand new element at `at`
    #[inline]
    pub(crate) fn insert(&mut self, element: E, at: L) {
        self.slots.insert(element, at);
    }

    /// Points an existing element at its new location
    #[inline]
    pub(crate) fn relocate(&mut self, element: &E, at: L) {
        if let Some(slot) = self.slots.get_mut(element) {
            *slot = at;
        }
    }

    #[inline]
    pub(crate) fn remove(&mut self, element: &E) -> Option<L> {
        self.slots.remove(element)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<E: Eq + Hash, L: Copy> Default for ElementIndex<E, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug, L: fmt::Debug> fmt::Debug for ElementIndex<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slots.iter()).finish()
    }
}
