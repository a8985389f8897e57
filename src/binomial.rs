//! Binomial Heap implementation
//!
//! A binomial heap is a collection of binomial trees with:
//! - O(log n) add and extract_min
//! - O(log n) decrease_priority (indexed variant)
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a root list of binomial trees, where:
//! - Each tree satisfies the heap property
//! - Roots are kept in increasing order of degree
//! - After every union there is at most one tree of each degree, analogous
//!   to the binary representation of n
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and height k
//!
//! **Key Operations**:
//! - **Add**: union a single-node tree into the root list (binary increment)
//! - **Extract-min**: remove the best root, reverse its children into a
//!   root list of their own and union them back in
//! - **Decrease-priority**: bubble the element up its ancestor chain by
//!   swapping payloads; node identities never move
//!
//! Nodes live in a [`slotmap`] arena and refer to each other by
//! [`NodeKey`], so parent/child/sibling links never form reference cycles.

use crate::error::HeapError;
use crate::storage::{ElementIndex, NodeKey};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use slotmap::SlotMap;
use std::hash::Hash;
use std::mem;

struct Node<E, P> {
    element: E,
    priority: P,
    parent: Option<NodeKey>,
    /// Leftmost child, which has the highest degree among the children
    child: Option<NodeKey>,
    /// Next root in the root list, or next (lower degree) sibling
    sibling: Option<NodeKey>,
    degree: usize,
}

/// Arena, root list and cached minimum shared by both heap flavours
struct Forest<E, P> {
    nodes: SlotMap<NodeKey, Node<E, P>>,
    /// First root, lowest degree
    head: Option<NodeKey>,
    /// Root holding a minimum priority
    min: Option<NodeKey>,
}

impl<E, P: Ord> Forest<E, P> {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            min: None,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.min = None;
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.min.map(|key| {
            let node = &self.nodes[key];
            (&node.element, &node.priority)
        })
    }

    /// Inserts a single-node tree and unions it into the root list
    fn insert(&mut self, element: E, priority: P) -> NodeKey {
        let key = self.nodes.insert(Node {
            element,
            priority,
            parent: None,
            child: None,
            sibling: None,
            degree: 0,
        });
        self.union(Some(key));
        key
    }

    /// Makes `child` the leftmost child of `parent`; both must be roots of
    /// equal degree
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        let first = self.nodes[parent].child;
        {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.sibling = first;
        }
        let node = &mut self.nodes[parent];
        node.child = Some(child);
        node.degree += 1;
    }

    /// Merges two degree-sorted root lists into one degree-sorted list
    fn merge_root_lists(&mut self, a: Option<NodeKey>, b: Option<NodeKey>) -> Option<NodeKey> {
        let (mut a, mut b) = (a, b);
        let mut head: Option<NodeKey> = None;
        let mut tail: Option<NodeKey> = None;

        loop {
            let next = match (a, b) {
                (None, None) => break,
                (Some(x), None) => {
                    a = self.nodes[x].sibling;
                    x
                }
                (None, Some(y)) => {
                    b = self.nodes[y].sibling;
                    y
                }
                (Some(x), Some(y)) => {
                    if self.nodes[x].degree <= self.nodes[y].degree {
                        a = self.nodes[x].sibling;
                        x
                    } else {
                        b = self.nodes[y].sibling;
                        y
                    }
                }
            };
            match tail {
                Some(t) => self.nodes[t].sibling = Some(next),
                None => head = Some(next),
            }
            tail = Some(next);
        }
        if let Some(t) = tail {
            self.nodes[t].sibling = None;
        }
        head
    }

    /// Classical binomial-heap union of `other` into the current root list
    ///
    /// After merging by degree, walk the list linking equal-degree neighbours.
    /// When three consecutive roots share a degree the first is left alone
    /// and the next two are linked on the following step.
    fn union(&mut self, other: Option<NodeKey>) {
        self.head = self.merge_root_lists(self.head, other);
        let Some(mut x) = self.head else {
            self.min = None;
            return;
        };

        let mut prev: Option<NodeKey> = None;
        let mut next = self.nodes[x].sibling;

        while let Some(nx) = next {
            let x_degree = self.nodes[x].degree;
            let after = self.nodes[nx].sibling;
            let triple = after.is_some_and(|a| self.nodes[a].degree == x_degree);

            if x_degree != self.nodes[nx].degree || triple {
                prev = Some(x);
                x = nx;
            } else if self.nodes[x].priority <= self.nodes[nx].priority {
                self.nodes[x].sibling = after;
                self.link(nx, x);
            } else {
                match prev {
                    Some(p) => self.nodes[p].sibling = Some(nx),
                    None => self.head = Some(nx),
                }
                self.link(x, nx);
                x = nx;
            }
            next = self.nodes[x].sibling;
        }

        self.refresh_min();
    }

    /// Rescans the root list for the minimum
    fn refresh_min(&mut self) {
        let mut best: Option<NodeKey> = None;
        let mut current = self.head;
        while let Some(key) = current {
            if best.map_or(true, |b| self.nodes[key].priority < self.nodes[b].priority) {
                best = Some(key);
            }
            current = self.nodes[key].sibling;
        }
        self.min = best;
    }

    /// Removes the minimum root and unions its children back in
    fn extract_min(&mut self) -> Option<(E, P)> {
        let min = self.min?;

        // Unlink the minimum from the root list
        let mut prev: Option<NodeKey> = None;
        let mut current = self.head;
        while let Some(key) = current {
            if key == min {
                break;
            }
            prev = Some(key);
            current = self.nodes[key].sibling;
        }
        let after = self.nodes[min].sibling;
        match prev {
            Some(p) => self.nodes[p].sibling = after,
            None => self.head = after,
        }

        // Children are stored highest degree first; reverse into a root list
        let mut reversed: Option<NodeKey> = None;
        let mut child = self.nodes[min].child;
        while let Some(c) = child {
            let node = &mut self.nodes[c];
            child = node.sibling;
            node.parent = None;
            node.sibling = reversed;
            reversed = Some(c);
        }

        let node = self.nodes.remove(min)?;
        self.min = None;
        self.union(reversed);
        Some((node.element, node.priority))
    }

    /// Exchanges the payloads of two nodes, leaving links untouched
    fn swap_payload(&mut self, a: NodeKey, b: NodeKey) {
        if let Some([x, y]) = self.nodes.get_disjoint_mut([a, b]) {
            mem::swap(&mut x.element, &mut y.element);
            mem::swap(&mut x.priority, &mut y.priority);
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let mut count = 0;
        let mut last_degree: Option<usize> = None;
        let mut current = self.head;
        while let Some(root) = current {
            let degree = self.nodes[root].degree;
            assert!(last_degree.map_or(true, |d| d < degree), "root degrees not increasing");
            assert!(self.nodes[root].parent.is_none());
            last_degree = Some(degree);
            count += self.check_tree(root);
            current = self.nodes[root].sibling;
        }
        assert_eq!(count, self.nodes.len());
    }

    #[cfg(test)]
    fn check_tree(&self, key: NodeKey) -> usize {
        let node = &self.nodes[key];
        let mut size = 1;
        let mut children = 0;
        let mut child = node.child;
        while let Some(c) = child {
            assert_eq!(self.nodes[c].parent, Some(key));
            assert!(self.nodes[c].priority >= node.priority, "heap order violated");
            size += self.check_tree(c);
            children += 1;
            child = self.nodes[c].sibling;
        }
        assert_eq!(children, node.degree);
        assert_eq!(size, 1 << node.degree);
        size
    }
}

/// Binomial Heap
///
/// # Example
///
/// ```rust
/// use comparative_heaps::PriorityQueue;
/// use comparative_heaps::binomial::BinomialHeap;
///
/// let mut heap = BinomialHeap::new();
/// heap.add("five", 5);
/// heap.add("one", 1);
/// assert_eq!(heap.peek(), Some((&"one", &1)));
/// ```
pub struct BinomialHeap<E, P> {
    forest: Forest<E, P>,
}

impl<E, P: Ord> BinomialHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            forest: Forest::new(),
        }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for BinomialHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        self.forest.insert(element, priority);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        self.forest.extract_min().ok_or(HeapError::EmptyStructure)
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.forest.peek()
    }

    fn len(&self) -> usize {
        self.forest.len()
    }

    fn clear(&mut self) {
        self.forest.clear();
    }
}

impl<E, P: Ord> Default for BinomialHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binomial heap with an element → node index
///
/// `decrease_priority` bubbles the element's payload up through its
/// ancestors; every payload swap moves both affected index entries.
pub struct IndexedBinomialHeap<E, P> {
    forest: Forest<E, P>,
    index: ElementIndex<E, NodeKey>,
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedBinomialHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            forest: Forest::new(),
            index: ElementIndex::new(),
        }
    }

    /// Swaps a node's payload with its parent's until heap order holds,
    /// returning the node the payload ended up in
    fn bubble_up(&mut self, mut key: NodeKey) -> NodeKey {
        while let Some(parent) = self.forest.nodes[key].parent {
            if self.forest.nodes[key].priority >= self.forest.nodes[parent].priority {
                break;
            }
            self.forest.swap_payload(key, parent);
            self.index.relocate(&self.forest.nodes[key].element, key);
            self.index.relocate(&self.forest.nodes[parent].element, parent);
            key = parent;
        }
        key
    }
}

impl<E: Clone + Eq + Hash, P: Ord> PriorityQueue<E, P> for IndexedBinomialHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        if self.index.contains(&element) {
            return false;
        }
        let key = self.forest.insert(element.clone(), priority);
        self.index.insert(element, key);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        let (element, priority) = self.forest.extract_min().ok_or(HeapError::EmptyStructure)?;
        self.index.remove(&element);
        Ok((element, priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.forest.peek()
    }

    fn len(&self) -> usize {
        self.forest.len()
    }

    fn clear(&mut self) {
        self.forest.clear();
        self.index.clear();
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let Some(key) = self.index.get(element) else {
            return Ok(false);
        };
        if priority >= self.forest.nodes[key].priority {
            return Ok(false);
        }
        // A strictly new minimum always bubbles all the way to a root
        let improves_min = self
            .forest
            .min
            .map_or(true, |m| priority < self.forest.nodes[m].priority);

        self.forest.nodes[key].priority = priority;
        let settled = self.bubble_up(key);
        if improves_min {
            self.forest.min = Some(settled);
        }
        Ok(true)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedPriorityQueue<E, P> for IndexedBinomialHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.index.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.index
            .get(element)
            .map(|key| &self.forest.nodes[key].priority)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> Default for IndexedBinomialHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}
