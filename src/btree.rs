//! B-tree map and the heaps built on it
//!
//! [`BTree`] is a classic B-tree of minimum degree `t`: every node other than
//! the root holds between `t - 1` and `2t - 1` sorted entries, an internal
//! node with `k` entries has `k + 1` children, and all leaves sit at the same
//! depth.
//!
//! Insertion is single-pass and top-down: any full node met on the way down
//! is split before descending into it, so the leaf that receives the new
//! entry always has room. A full root is split first, which is the only way
//! the tree grows taller.
//!
//! Removal is also top-down. Before descending into a child that holds only
//! `t - 1` entries the child is topped up, either by rotating an entry
//! through the parent from a sibling with spare entries or by merging it
//! with a sibling around the separating parent entry. Removing an internal
//! entry replaces it with its in-order predecessor or successor. When the
//! root is left empty its only child becomes the new root.

use crate::chain::ChainEnds;
use crate::error::ConfigError;
use crate::map_heap::{IndexedMapHeap, MapHeap, PriorityMap};
use std::fmt;
use std::hash::Hash;
use std::mem;

/// Minimum degree used by [`BTree::new`] and the B-tree heaps' `new`
pub const DEFAULT_MIN_DEGREE: usize = 8;

struct Node<K, V> {
    entries: Vec<(K, V)>,
    children: Vec<Box<Node<K, V>>>,
}

impl<K: Ord, V> Node<K, V> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    /// Splits the full child `i` around its median, which moves up into
    /// this node
    fn split_child(&mut self, i: usize, t: usize) {
        let child = &mut self.children[i];
        let right_entries = child.entries.split_off(t);
        let right_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(t)
        };
        let Some(median) = child.entries.pop() else {
            return;
        };
        self.entries.insert(i, median);
        self.children.insert(
            i + 1,
            Box::new(Node {
                entries: right_entries,
                children: right_children,
            }),
        );
    }

    fn insert_non_full(&mut self, key: K, value: V, t: usize) {
        let mut i = match self.search(&key) {
            Ok(i) | Err(i) => i,
        };
        if self.is_leaf() {
            self.entries.insert(i, (key, value));
            return;
        }
        if self.children[i].entries.len() == 2 * t - 1 {
            self.split_child(i, t);
            if key > self.entries[i].0 {
                i += 1;
            }
        }
        self.children[i].insert_non_full(key, value, t);
    }

    /// Moves the last entry of child `i - 1` up and the separator down into
    /// child `i`
    fn borrow_from_prev(&mut self, i: usize) {
        let (left, right) = self.children.split_at_mut(i);
        let sibling = &mut left[i - 1];
        let child = &mut right[0];
        let Some(moved) = sibling.entries.pop() else {
            return;
        };
        let separator = mem::replace(&mut self.entries[i - 1], moved);
        child.entries.insert(0, separator);
        if let Some(grandchild) = sibling.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    /// Moves the first entry of child `i + 1` up and the separator down
    /// into child `i`
    fn borrow_from_next(&mut self, i: usize) {
        let (left, right) = self.children.split_at_mut(i + 1);
        let child = &mut left[i];
        let sibling = &mut right[0];
        if sibling.entries.is_empty() {
            return;
        }
        let moved = sibling.entries.remove(0);
        let separator = mem::replace(&mut self.entries[i], moved);
        child.entries.push(separator);
        if !sibling.is_leaf() {
            child.children.push(sibling.children.remove(0));
        }
    }

    /// Merges child `i + 1` and separator `i` into child `i`
    fn merge(&mut self, i: usize) {
        let right = self.children.remove(i + 1);
        let separator = self.entries.remove(i);
        let left = &mut self.children[i];
        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);
    }

    /// Ensures child `i` holds at least `t` entries, returning the index of
    /// the child that now covers the same key range
    fn fill(&mut self, i: usize, t: usize) -> usize {
        if i > 0 && self.children[i - 1].entries.len() >= t {
            self.borrow_from_prev(i);
            i
        } else if i < self.entries.len() && self.children[i + 1].entries.len() >= t {
            self.borrow_from_next(i);
            i
        } else if i < self.entries.len() {
            self.merge(i);
            i
        } else {
            self.merge(i - 1);
            i - 1
        }
    }

    fn remove_max(&mut self, t: usize) -> Option<(K, V)> {
        if self.is_leaf() {
            return self.entries.pop();
        }
        let mut last = self.children.len() - 1;
        if self.children[last].entries.len() < t {
            last = self.fill(last, t);
        }
        self.children[last].remove_max(t)
    }

    fn remove_min(&mut self, t: usize) -> Option<(K, V)> {
        if self.is_leaf() {
            return if self.entries.is_empty() {
                None
            } else {
                Some(self.entries.remove(0))
            };
        }
        let first = if self.children[0].entries.len() < t {
            self.fill(0, t)
        } else {
            0
        };
        self.children[first].remove_min(t)
    }

    fn remove(&mut self, key: &K, t: usize) -> Option<V> {
        match self.search(key) {
            Ok(i) if self.is_leaf() => Some(self.entries.remove(i).1),
            Ok(i) => {
                if self.children[i].entries.len() >= t {
                    let predecessor = self.children[i].remove_max(t)?;
                    Some(mem::replace(&mut self.entries[i], predecessor).1)
                } else if self.children[i + 1].entries.len() >= t {
                    let successor = self.children[i + 1].remove_min(t)?;
                    Some(mem::replace(&mut self.entries[i], successor).1)
                } else {
                    self.merge(i);
                    self.children[i].remove(key, t)
                }
            }
            Err(_) if self.is_leaf() => None,
            Err(mut i) => {
                if self.children[i].entries.len() < t {
                    i = self.fill(i, t);
                }
                self.children[i].remove(key, t)
            }
        }
    }
}

/// Ordered map backed by a B-tree of configurable minimum degree
pub struct BTree<K, V> {
    root: Node<K, V>,
    min_degree: usize,
    len: usize,
}

impl<K: Ord, V> BTree<K, V> {
    /// Creates an empty tree of minimum degree [`DEFAULT_MIN_DEGREE`]
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            min_degree: DEFAULT_MIN_DEGREE,
            len: 0,
        }
    }

    /// Creates an empty tree whose nodes hold `t - 1` to `2t - 1` entries
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidMinimumDegree`] if `t < 2`.
    pub fn with_min_degree(t: usize) -> Result<Self, ConfigError> {
        if t < 2 {
            return Err(ConfigError::InvalidMinimumDegree(t));
        }
        Ok(Self {
            root: Node::new(),
            min_degree: t,
            len: 0,
        })
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; an empty tree has height 1
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = &**child;
            height += 1;
        }
        height
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = &self.root;
        loop {
            match node.search(key) {
                Ok(i) => return Some(&node.entries[i].1),
                Err(i) => node = &**node.children.get(i)?,
            }
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut node = &mut self.root;
        loop {
            match node.search(key) {
                Ok(i) => return Some(&mut node.entries[i].1),
                Err(i) => node = &mut **node.children.get_mut(i)?,
            }
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`, returning the value it replaced
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(mem::replace(slot, value));
        }
        let t = self.min_degree;
        if self.root.entries.len() == 2 * t - 1 {
            let old_root = mem::replace(&mut self.root, Node::new());
            self.root.children.push(Box::new(old_root));
            self.root.split_child(0, t);
            tracing::trace!("split full b-tree root, height now {}", self.height());
        }
        self.root.insert_non_full(key, value, t);
        self.len += 1;
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.root.remove(key, self.min_degree);
        if self.root.entries.is_empty() {
            if let Some(child) = self.root.children.pop() {
                self.root = *child;
            }
        }
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Removes and returns the entry with the smallest key
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.root.remove_min(self.min_degree);
        if self.root.entries.is_empty() {
            if let Some(child) = self.root.children.pop() {
                self.root = *child;
            }
        }
        if first.is_some() {
            self.len -= 1;
        }
        first
    }

    /// The entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            node = &**child;
        }
        node.entries.first().map(|(k, v)| (k, v))
    }

    /// The entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = &self.root;
        while let Some(child) = node.children.last() {
            node = &**child;
        }
        node.entries.last().map(|(k, v)| (k, v))
    }

    pub fn clear(&mut self) {
        self.root = Node::new();
        self.len = 0;
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        fn check<K: Ord, V>(node: &Node<K, V>, t: usize, is_root: bool, depth: usize, leaf_depth: &mut Option<usize>) -> usize {
            assert!(node.entries.len() <= 2 * t - 1, "overfull node");
            if !is_root {
                assert!(node.entries.len() >= t - 1, "underfull node");
            }
            assert!(node.entries.windows(2).all(|w| w[0].0 < w[1].0));
            if node.is_leaf() {
                match *leaf_depth {
                    Some(d) => assert_eq!(d, depth, "leaves at different depths"),
                    None => *leaf_depth = Some(depth),
                }
                return node.entries.len();
            }
            assert_eq!(node.children.len(), node.entries.len() + 1);
            let mut count = node.entries.len();
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    assert!(child.entries.iter().all(|(k, _)| *k > node.entries[i - 1].0));
                }
                if i < node.entries.len() {
                    assert!(child.entries.iter().all(|(k, _)| *k < node.entries[i].0));
                }
                count += check(child, t, false, depth + 1, leaf_depth);
            }
            count
        }
        let count = check(&self.root, self.min_degree, true, 0, &mut None);
        assert_eq!(count, self.len);
    }
}

impl<K: Ord, V> Default for BTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn entries<K: fmt::Debug, V: fmt::Debug>(node: &Node<K, V>, map: &mut fmt::DebugMap<'_, '_>) {
            for (i, (k, v)) in node.entries.iter().enumerate() {
                if let Some(child) = node.children.get(i) {
                    entries(child, map);
                }
                map.entry(k, v);
            }
            if let Some(child) = node.children.get(node.entries.len()) {
                entries(child, map);
            }
        }
        let mut map = f.debug_map();
        entries(&self.root, &mut map);
        map.finish()
    }
}

impl<K: Ord, V> PriorityMap<K, V> for BTree<K, V> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, key: &K) -> Option<&V> {
        BTree::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTree::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        BTree::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        BTree::remove(self, key)
    }

    fn first_key_value(&self) -> Option<(&K, &V)> {
        BTree::first_key_value(self)
    }

    fn clear(&mut self) {
        BTree::clear(self)
    }
}

/// Unindexed heap keyed by a [`BTree`]
pub type BTreeHeap<E, P> = MapHeap<E, P, BTree<P, Vec<E>>>;

/// Indexed heap keyed by a [`BTree`]
pub type IndexedBTreeHeap<E, P> = IndexedMapHeap<E, P, BTree<P, ChainEnds>>;

impl<E, P: Ord + Clone> MapHeap<E, P, BTree<P, Vec<E>>> {
    /// Creates an empty heap over a tree of minimum degree [`DEFAULT_MIN_DEGREE`]
    pub fn new() -> Self {
        Self::from_map(BTree::new())
    }

    /// Creates an empty heap over a tree of minimum degree `t`
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidMinimumDegree`] if `t < 2`.
    pub fn with_min_degree(t: usize) -> Result<Self, ConfigError> {
        BTree::with_min_degree(t).map(Self::from_map)
    }
}

impl<E: Clone + Eq + Hash, P: Ord + Clone> IndexedMapHeap<E, P, BTree<P, ChainEnds>> {
    /// Creates an empty heap over a tree of minimum degree [`DEFAULT_MIN_DEGREE`]
    pub fn new() -> Self {
        Self::from_map(BTree::new())
    }

    /// Creates an empty heap over a tree of minimum degree `t`
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidMinimumDegree`] if `t < 2`.
    pub fn with_min_degree(t: usize) -> Result<Self, ConfigError> {
        BTree::with_min_degree(t).map(Self::from_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{IndexedPriorityQueue, PriorityQueue};

    #[test]
    fn test_rejects_small_degree() {
        assert_eq!(
            BTree::<u32, u32>::with_min_degree(1).err(),
            Some(ConfigError::InvalidMinimumDegree(1))
        );
        assert!(BTreeHeap::<u32, u32>::with_min_degree(0).is_err());
        assert_eq!(BTree::<u32, u32>::new().min_degree(), DEFAULT_MIN_DEGREE);
    }

    #[test]
    fn test_root_split() {
        let mut tree = BTree::with_min_degree(2).unwrap();
        for k in [10, 20, 30] {
            tree.insert(k, ());
        }
        assert_eq!(tree.height(), 1);
        tree.insert(40, ());
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root.entries.len(), 1);
        assert_eq!(tree.root.entries[0].0, 20);
        tree.check_invariants();
    }

    #[test]
    fn test_insert_replace_and_get() {
        let mut tree = BTree::with_min_degree(3).unwrap();
        for k in 0..200u32 {
            assert_eq!(tree.insert(k, k), None);
        }
        assert_eq!(tree.insert(57, 1000), Some(57));
        assert_eq!(tree.len(), 200);
        assert_eq!(tree.get(&57), Some(&1000));
        assert_eq!(tree.get(&500), None);
        if let Some(v) = tree.get_mut(&3) {
            *v = 33;
        }
        assert_eq!(tree.get(&3), Some(&33));
        tree.check_invariants();
    }

    #[test]
    fn test_remove_every_case() {
        for t in [2, 3, 5] {
            let mut tree = BTree::with_min_degree(t).unwrap();
            let keys: Vec<u32> = (0..400).map(|i| (i * 263) % 400).collect();
            for &k in &keys {
                tree.insert(k, k + 1);
            }
            tree.check_invariants();

            for &k in keys.iter().rev().step_by(2) {
                assert_eq!(tree.remove(&k), Some(k + 1), "t = {t}, key {k}");
                tree.check_invariants();
            }
            assert_eq!(tree.len(), 200);
            assert_eq!(tree.remove(&keys[keys.len() - 1]), None);

            let mut rest: Vec<u32> = keys.iter().rev().skip(1).step_by(2).copied().collect();
            rest.sort_unstable();
            assert_eq!(tree.first_key_value().map(|(k, _)| *k), rest.first().copied());
            assert_eq!(tree.last_key_value().map(|(k, _)| *k), rest.last().copied());

            for k in rest {
                assert_eq!(tree.pop_first().map(|(key, _)| key), Some(k));
                tree.check_invariants();
            }
            assert!(tree.is_empty());
            assert_eq!(tree.height(), 1);
        }
    }

    #[test]
    fn test_matches_std_btreemap() {
        let mut ours = BTree::with_min_degree(2).unwrap();
        let mut reference = std::collections::BTreeMap::new();
        let mut state = 12345u64;
        for _ in 0..5000 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let key = (state >> 33) % 300;
            match (state >> 20) % 3 {
                0 | 1 => assert_eq!(ours.insert(key, state), reference.insert(key, state)),
                _ => assert_eq!(ours.remove(&key), reference.remove(&key)),
            }
        }
        ours.check_invariants();
        assert_eq!(ours.len(), reference.len());
        assert_eq!(ours.first_key_value(), reference.first_key_value());
        assert_eq!(ours.last_key_value(), reference.last_key_value());
    }

    #[test]
    fn test_heaps() {
        let mut heap = BTreeHeap::with_min_degree(2).unwrap();
        for i in (0..100u32).rev() {
            heap.add(i, i / 3);
        }
        let mut last = 0;
        for _ in 0..100 {
            let (_, p) = heap.extract_min().unwrap();
            assert!(p >= last);
            last = p;
        }
        heap.map().check_invariants();

        let mut indexed = IndexedBTreeHeap::new();
        indexed.add(1, 1);
        indexed.add(2, 2);
        assert_eq!(indexed.decrease_priority(&2, 0), Ok(true));
        assert_eq!(indexed.priority_of(&2), Some(&0));
        assert_eq!(indexed.extract_min(), Ok((2, 0)));
        assert_eq!(indexed.extract_min(), Ok((1, 1)));
    }
}
