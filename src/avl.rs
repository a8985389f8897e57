//! AVL tree map and the heaps built on it
//!
//! [`AvlMap`] is a height-balanced binary search tree: the heights of the two
//! subtrees of any node differ by at most one. Insertions and removals walk
//! down recursively and rebalance every node on the way back up with single
//! or double rotations, so all operations are O(log n).
//!
//! [`AvlTreeHeap`] and [`IndexedAvlTreeHeap`] plug the map into
//! [`crate::map_heap`].
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::{IndexedPriorityQueue, PriorityQueue};
//! use comparative_heaps::avl::IndexedAvlTreeHeap;
//!
//! let mut heap = IndexedAvlTreeHeap::new();
//! heap.add('a', 7);
//! heap.add('b', 7);
//! heap.add('c', 9);
//! assert_eq!(heap.decrease_priority(&'c', 1), Ok(true));
//! assert_eq!(heap.extract_min(), Ok(('c', 1)));
//! ```

use crate::chain::ChainEnds;
use crate::map_heap::{IndexedMapHeap, MapHeap, PriorityMap};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

type Link<K, V> = Option<Box<AvlNode<K, V>>>;

struct AvlNode<K, V> {
    key: K,
    value: V,
    height: u8,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> AvlNode<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_right<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            node.update_height();
            pivot.right = Some(node);
            pivot.update_height();
            pivot
        }
        None => node,
    }
}

fn rotate_left<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            node.update_height();
            pivot.left = Some(node);
            pivot.update_height();
            pivot
        }
        None => node,
    }
}

/// Restores the balance of `node` after one of its subtrees changed height
/// by at most one
fn rebalance<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    node.update_height();
    let balance = node.balance_factor();
    if balance > 1 {
        if node.left.as_ref().map_or(0, |l| l.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        if node.right.as_ref().map_or(0, |r| r.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}

fn insert<K: Ord, V>(link: Link<K, V>, key: K, value: V, old: &mut Option<V>) -> Box<AvlNode<K, V>> {
    let Some(mut node) = link else {
        return AvlNode::leaf(key, value);
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert(node.left.take(), key, value, old)),
        Ordering::Greater => node.right = Some(insert(node.right.take(), key, value, old)),
        Ordering::Equal => {
            *old = Some(std::mem::replace(&mut node.value, value));
            return node;
        }
    }
    rebalance(node)
}

/// Detaches the leftmost node of a subtree, returning the rebalanced rest
fn take_min<K, V>(mut node: Box<AvlNode<K, V>>) -> (Link<K, V>, Box<AvlNode<K, V>>) {
    match node.left.take() {
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
        None => (node.right.take(), node),
    }
}

fn remove<K: Ord, V>(link: Link<K, V>, key: &K, removed: &mut Option<V>) -> Link<K, V> {
    let mut node = link?;
    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove(node.right.take(), key, removed),
        Ordering::Equal => {
            let AvlNode {
                value, left, right, ..
            } = *node;
            *removed = Some(value);
            return match (left, right) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (rest, mut successor) = take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(rebalance(successor))
                }
            };
        }
    }
    Some(rebalance(node))
}

/// Ordered map backed by an AVL tree
pub struct AvlMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Creates an empty map
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; an empty map has height 0
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`, returning the value it replaced
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut old = None;
        self.root = Some(insert(self.root.take(), key, value, &mut old));
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        self.root = remove(self.root.take(), key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// The entry with the smallest key
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// The entry with the largest key
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Keys in ascending order
    pub fn keys(&self) -> Vec<&K> {
        fn walk<'a, K, V>(link: &'a Link<K, V>, out: &mut Vec<&'a K>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(&node.key);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        fn check<K: Ord, V>(link: &Link<K, V>, lower: Option<&K>, upper: Option<&K>) -> (u8, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            assert!(lower.map_or(true, |l| *l < node.key));
            assert!(upper.map_or(true, |u| node.key < *u));
            let (lh, ln) = check(&node.left, lower, Some(&node.key));
            let (rh, rn) = check(&node.right, Some(&node.key), upper);
            assert!((i16::from(lh) - i16::from(rh)).abs() <= 1, "unbalanced node");
            assert_eq!(node.height, 1 + lh.max(rh));
            (node.height, ln + rn + 1)
        }
        let (_, count) = check(&self.root, None, None);
        assert_eq!(count, self.len);
    }
}

impl<K: Ord, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn entries<K: fmt::Debug, V: fmt::Debug>(link: &Link<K, V>, map: &mut fmt::DebugMap<'_, '_>) {
            if let Some(node) = link {
                entries(&node.left, map);
                map.entry(&node.key, &node.value);
                entries(&node.right, map);
            }
        }
        let mut map = f.debug_map();
        entries(&self.root, &mut map);
        map.finish()
    }
}

impl<K: Ord, V> PriorityMap<K, V> for AvlMap<K, V> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, key: &K) -> Option<&V> {
        AvlMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        AvlMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        AvlMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        AvlMap::remove(self, key)
    }

    fn first_key_value(&self) -> Option<(&K, &V)> {
        AvlMap::first_key_value(self)
    }

    fn clear(&mut self) {
        AvlMap::clear(self)
    }
}

/// Unindexed heap keyed by an [`AvlMap`]
pub type AvlTreeHeap<E, P> = MapHeap<E, P, AvlMap<P, Vec<E>>>;

/// Indexed heap keyed by an [`AvlMap`]
pub type IndexedAvlTreeHeap<E, P> = IndexedMapHeap<E, P, AvlMap<P, ChainEnds>>;

impl<E, P: Ord + Clone> MapHeap<E, P, AvlMap<P, Vec<E>>> {
    /// Creates an empty AVL-backed heap
    pub fn new() -> Self {
        Self::from_map(AvlMap::new())
    }
}

impl<E: Clone + Eq + Hash, P: Ord + Clone> IndexedMapHeap<E, P, AvlMap<P, ChainEnds>> {
    /// Creates an empty AVL-backed indexed heap
    pub fn new() -> Self {
        Self::from_map(AvlMap::new())
    }
}
