//! Priority queues layered on an ordered map keyed by priority
//!
//! The map stores one entry per distinct priority; every entry owns the group
//! of elements currently queued at that priority, so the map itself never
//! sees duplicate keys. Extraction reads the map's first key, takes one
//! element from its group and drops the entry once the group is empty.
//!
//! - [`MapHeap`] keeps each group as a `Vec` used as a stack.
//! - [`IndexedMapHeap`] keeps each group as a doubly linked chain so an
//!   element can be unlinked in O(1) when its priority decreases.
//!
//! The ordered maps themselves live in [`crate::avl`], [`crate::btree`] and
//! [`crate::veb`]; each implements [`PriorityMap`] and names its heaps with
//! type aliases over the two structs here.

use crate::chain::{ChainEnds, Chains};
use crate::error::HeapError;
use crate::storage::{ElementIndex, NodeKey};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// The ordered-map operations the map-backed heaps need
pub trait PriorityMap<K, V> {
    /// Number of distinct keys
    fn len(&self) -> usize;

    /// Returns `true` if the map holds no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Inserts or replaces the value under `key`, returning the old value
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    /// The entry with the smallest key
    fn first_key_value(&self) -> Option<(&K, &V)>;

    fn clear(&mut self);
}

/// Unindexed heap over a [`PriorityMap`] of element stacks
pub struct MapHeap<E, P, M> {
    map: M,
    len: usize,
    _marker: PhantomData<fn() -> (E, P)>,
}

impl<E, P, M> MapHeap<E, P, M>
where
    P: Ord + Clone,
    M: PriorityMap<P, Vec<E>>,
{
    /// Wraps an empty map
    pub(crate) fn from_map(map: M) -> Self {
        debug_assert!(map.is_empty());
        Self {
            map,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// The underlying map, one entry per distinct queued priority
    pub fn map(&self) -> &M {
        &self.map
    }
}

impl<E, P, M> PriorityQueue<E, P> for MapHeap<E, P, M>
where
    P: Ord + Clone,
    M: PriorityMap<P, Vec<E>>,
{
    fn add(&mut self, element: E, priority: P) -> bool {
        match self.map.get_mut(&priority) {
            Some(group) => group.push(element),
            None => {
                self.map.insert(priority, vec![element]);
            }
        }
        self.len += 1;
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let priority = match self.map.first_key_value() {
            Some((priority, _)) => priority.clone(),
            None => return Err(HeapError::EmptyStructure),
        };
        let group = self.map.get_mut(&priority).ok_or(HeapError::EmptyStructure)?;
        let element = group.pop().ok_or(HeapError::EmptyStructure)?;
        if group.is_empty() {
            self.map.remove(&priority);
        }
        self.len -= 1;
        Ok((element, priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        let (priority, group) = self.map.first_key_value()?;
        group.last().map(|element| (element, priority))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.map.clear();
        self.len = 0;
    }
}

impl<E, P, M> Default for MapHeap<E, P, M>
where
    P: Ord + Clone,
    M: PriorityMap<P, Vec<E>> + Default,
{
    fn default() -> Self {
        Self::from_map(M::default())
    }
}

impl<E, P, M: fmt::Debug> fmt::Debug for MapHeap<E, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapHeap")
            .field("len", &self.len)
            .field("map", &self.map)
            .finish()
    }
}

/// Indexed heap over a [`PriorityMap`] of collision chains
///
/// Every element owns one link in a shared chain arena; the map stores the
/// ends of the chain for each priority and the index points at the link.
/// `decrease_priority` moves the link from its old chain to the front of
/// the new priority's chain, creating that map entry when needed.
pub struct IndexedMapHeap<E, P, M> {
    map: M,
    chains: Chains<E, P>,
    index: ElementIndex<E, NodeKey>,
}

impl<E, P, M> IndexedMapHeap<E, P, M>
where
    E: Clone + Eq + Hash,
    P: Ord + Clone,
    M: PriorityMap<P, ChainEnds>,
{
    pub(crate) fn from_map(map: M) -> Self {
        debug_assert!(map.is_empty());
        Self {
            map,
            chains: Chains::new(),
            index: ElementIndex::new(),
        }
    }

    /// Number of distinct queued priorities
    pub fn distinct_priorities(&self) -> usize {
        self.map.len()
    }

    /// Files a detached link at the front of its priority's chain
    fn file(&mut self, key: NodeKey, priority: P) {
        let ends = self.map.get(&priority).copied();
        let ends = self.chains.attach_front(ends, key);
        self.map.insert(priority, ends);
    }

    /// Stores the remainder of a chain after one of its links left it
    fn settle(&mut self, priority: &P, rest: Option<ChainEnds>) {
        match rest {
            Some(rest) => {
                if let Some(ends) = self.map.get_mut(priority) {
                    *ends = rest;
                }
            }
            None => {
                self.map.remove(priority);
            }
        }
    }
}

impl<E, P, M> PriorityQueue<E, P> for IndexedMapHeap<E, P, M>
where
    E: Clone + Eq + Hash,
    P: Ord + Clone,
    M: PriorityMap<P, ChainEnds>,
{
    fn add(&mut self, element: E, priority: P) -> bool {
        if self.index.contains(&element) {
            return false;
        }
        let key = self.chains.alloc(element.clone(), priority.clone());
        self.file(key, priority);
        self.index.insert(element, key);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let (priority, ends) = match self.map.first_key_value() {
            Some((priority, ends)) => (priority.clone(), *ends),
            None => return Err(HeapError::EmptyStructure),
        };
        let (rest, link) = self.chains.pop_front(ends);
        self.settle(&priority, rest);
        let link = link.ok_or(HeapError::EmptyStructure)?;
        self.index.remove(&link.element);
        Ok((link.element, link.priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        let (_, ends) = self.map.first_key_value()?;
        let link = self.chains.get(ends.head);
        Some((&link.element, &link.priority))
    }

    fn len(&self) -> usize {
        self.chains.len()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.chains.clear();
        self.index.clear();
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let Some(key) = self.index.get(element) else {
            return Ok(false);
        };
        let old = self.chains.get(key).priority.clone();
        if priority >= old {
            return Ok(false);
        }
        let Some(ends) = self.map.get(&old).copied() else {
            return Ok(false);
        };
        let rest = self.chains.detach(ends, key);
        self.settle(&old, rest);
        self.chains.get_mut(key).priority = priority.clone();
        self.file(key, priority);
        Ok(true)
    }
}

impl<E, P, M> IndexedPriorityQueue<E, P> for IndexedMapHeap<E, P, M>
where
    E: Clone + Eq + Hash,
    P: Ord + Clone,
    M: PriorityMap<P, ChainEnds>,
{
    fn contains(&self, element: &E) -> bool {
        self.index.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.index
            .get(element)
            .map(|key| &self.chains.get(key).priority)
    }
}

impl<E, P, M> Default for IndexedMapHeap<E, P, M>
where
    E: Clone + Eq + Hash,
    P: Ord + Clone,
    M: PriorityMap<P, ChainEnds> + Default,
{
    fn default() -> Self {
        Self::from_map(M::default())
    }
}
