//! Pairing Heap implementation
//!
//! A pairing heap is a single heap-ordered multiway tree with:
//! - O(1) add
//! - O(log n) amortized extract_min
//!
//! Every node stores its parent, its leftmost child and its next sibling.
//! `add` merges a one-node tree against the root. `extract_min` collects the
//! root's children and recombines them with the classic two-pass pairing:
//! adjacent pairs are merged left to right, then the resulting trees are
//! merged right to left into one.
//!
//! The indexed heap decreases a priority by moving the element/priority
//! payload up the ancestor chain, so arena keys never change owner other than
//! through those swaps.

use crate::error::HeapError;
use crate::storage::{ElementIndex, NodeKey};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::hash::Hash;
use std::mem;

struct Node<E, P> {
    element: E,
    priority: P,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    sibling: Option<NodeKey>,
}

struct Tree<E, P> {
    nodes: SlotMap<NodeKey, Node<E, P>>,
    root: Option<NodeKey>,
}

impl<E, P: Ord> Tree<E, P> {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.root.map(|key| {
            let node = &self.nodes[key];
            (&node.element, &node.priority)
        })
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Merges two detached roots; on equal priorities `a` stays on top
    fn merge(&mut self, a: NodeKey, b: NodeKey) -> NodeKey {
        let (winner, loser) = if self.nodes[b].priority < self.nodes[a].priority {
            (b, a)
        } else {
            (a, b)
        };
        let first = self.nodes[winner].child;
        {
            let l = &mut self.nodes[loser];
            l.parent = Some(winner);
            l.sibling = first;
        }
        self.nodes[winner].child = Some(loser);
        winner
    }

    fn insert(&mut self, element: E, priority: P) -> NodeKey {
        let key = self.nodes.insert(Node {
            element,
            priority,
            parent: None,
            child: None,
            sibling: None,
        });
        self.root = Some(match self.root {
            Some(root) => self.merge(root, key),
            None => key,
        });
        key
    }

    fn extract_min(&mut self) -> Option<(E, P)> {
        let root = self.root?;

        let mut children: SmallVec<[NodeKey; 16]> = SmallVec::new();
        let mut current = self.nodes[root].child;
        while let Some(child) = current {
            let node = &mut self.nodes[child];
            current = node.sibling.take();
            node.parent = None;
            children.push(child);
        }

        self.root = self.merge_pairs(&children);
        let node = self.nodes.remove(root)?;
        Some((node.element, node.priority))
    }

    /// Two-pass pairing over a list of detached roots
    fn merge_pairs(&mut self, roots: &[NodeKey]) -> Option<NodeKey> {
        let mut paired: SmallVec<[NodeKey; 16]> = SmallVec::new();
        for pair in roots.chunks(2) {
            match *pair {
                [a, b] => paired.push(self.merge(a, b)),
                [a] => paired.push(a),
                _ => {}
            }
        }

        let mut result = paired.pop()?;
        while let Some(next) = paired.pop() {
            result = self.merge(next, result);
        }
        Some(result)
    }

    fn swap_payload(&mut self, a: NodeKey, b: NodeKey) {
        if let Some([x, y]) = self.nodes.get_disjoint_mut([a, b]) {
            mem::swap(&mut x.element, &mut y.element);
            mem::swap(&mut x.priority, &mut y.priority);
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        match self.root {
            Some(root) => {
                assert!(self.nodes[root].parent.is_none());
                assert!(self.nodes[root].sibling.is_none());
                assert_eq!(self.check_subtree(root), self.nodes.len());
            }
            None => assert!(self.nodes.is_empty()),
        }
    }

    #[cfg(test)]
    fn check_subtree(&self, key: NodeKey) -> usize {
        let mut size = 1;
        let mut current = self.nodes[key].child;
        while let Some(child) = current {
            assert_eq!(self.nodes[child].parent, Some(key));
            assert!(self.nodes[child].priority >= self.nodes[key].priority);
            size += self.check_subtree(child);
            current = self.nodes[child].sibling;
        }
        size
    }
}

/// Pairing Heap
///
/// # Example
///
/// ```rust
/// use comparative_heaps::PriorityQueue;
/// use comparative_heaps::pairing::PairingHeap;
///
/// let mut heap = PairingHeap::new();
/// heap.add("item", 5);
/// heap.add("first", 1);
/// assert_eq!(heap.peek(), Some((&"first", &1)));
/// ```
pub struct PairingHeap<E, P> {
    tree: Tree<E, P>,
}

impl<E, P: Ord> PairingHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for PairingHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        self.tree.insert(element, priority);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        self.tree.extract_min().ok_or(HeapError::EmptyStructure)
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.tree.peek()
    }

    fn len(&self) -> usize {
        self.tree.nodes.len()
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<E, P: Ord> Default for PairingHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairing heap with an element → node index
pub struct IndexedPairingHeap<E, P> {
    tree: Tree<E, P>,
    index: ElementIndex<E, NodeKey>,
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedPairingHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            index: ElementIndex::new(),
        }
    }

    /// Swaps payloads with the parent while the heap order is violated
    fn percolate_up(&mut self, mut key: NodeKey) {
        while let Some(parent) = self.tree.nodes[key].parent {
            if self.tree.nodes[key].priority >= self.tree.nodes[parent].priority {
                break;
            }
            self.tree.swap_payload(key, parent);
            self.index.relocate(&self.tree.nodes[key].element, key);
            self.index.relocate(&self.tree.nodes[parent].element, parent);
            key = parent;
        }
    }
}

impl<E: Clone + Eq + Hash, P: Ord> PriorityQueue<E, P> for IndexedPairingHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        if self.index.contains(&element) {
            return false;
        }
        let key = self.tree.insert(element.clone(), priority);
        self.index.insert(element, key);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let (element, priority) = self.tree.extract_min().ok_or(HeapError::EmptyStructure)?;
        self.index.remove(&element);
        Ok((element, priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.tree.peek()
    }

    fn len(&self) -> usize {
        self.tree.nodes.len()
    }

    fn clear(&mut self) {
        self.tree.clear();
        self.index.clear();
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let Some(key) = self.index.get(element) else {
            return Ok(false);
        };
        if priority >= self.tree.nodes[key].priority {
            return Ok(false);
        }
        self.tree.nodes[key].priority = priority;
        self.percolate_up(key);
        Ok(true)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedPriorityQueue<E, P> for IndexedPairingHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.index.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.index
            .get(element)
            .map(|key| &self.tree.nodes[key].priority)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> Default for IndexedPairingHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}
