//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a collection of heap-ordered trees with:
//! - O(1) add
//! - O(log n) amortized extract_min
//!
//! Roots are linked in a circular doubly linked ring and each node's children
//! form a ring of their own. The heap keeps a pointer to the minimum root.
//! `extract_min` splices the removed node's children into the root ring and
//! then consolidates: roots of equal degree are linked pairwise until every
//! root degree is distinct.
//!
//! This variant has no marked nodes and therefore no cascading cuts. The
//! indexed heap decreases a priority by cutting the node straight into the
//! root ring whenever it would violate heap order.

use crate::error::HeapError;
use crate::storage::{ElementIndex, NodeKey};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use slotmap::SlotMap;
use std::hash::Hash;

/// Golden ratio, the base of the degree bound log_φ n
const PHI: f64 = 1.618_033_988_749_895;

struct Node<E, P> {
    element: E,
    priority: P,
    parent: Option<NodeKey>,
    child: Option<NodeKey>,
    left: NodeKey,
    right: NodeKey,
    degree: usize,
}

/// Upper bound on any root degree in a heap of `len` nodes: ⌊log_φ n⌋ + 1
fn degree_bound(len: usize) -> usize {
    if len < 2 {
        return 1;
    }
    ((len as f64).ln() / PHI.ln()).floor() as usize + 1
}

/// Arena plus root ring shared by both heap flavours
struct Forest<E, P> {
    nodes: SlotMap<NodeKey, Node<E, P>>,
    min: Option<NodeKey>,
}

impl<E, P: Ord> Forest<E, P> {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            min: None,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.min.map(|key| {
            let node = &self.nodes[key];
            (&node.element, &node.priority)
        })
    }

    /// Inserts `node` into the ring containing `anchor`, just left of it
    fn splice_before(&mut self, anchor: NodeKey, node: NodeKey) {
        let anchor_left = self.nodes[anchor].left;
        {
            let n = &mut self.nodes[node];
            n.right = anchor;
            n.left = anchor_left;
        }
        self.nodes[anchor_left].right = node;
        self.nodes[anchor].left = node;
    }

    /// Detaches `node` from whatever ring it is in, leaving it a ring of one
    fn unlink(&mut self, node: NodeKey) {
        let (left, right) = {
            let n = &self.nodes[node];
            (n.left, n.right)
        };
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        let n = &mut self.nodes[node];
        n.left = node;
        n.right = node;
    }

    /// Adds a detached node to the root ring and updates the minimum
    fn add_root(&mut self, node: NodeKey) {
        self.nodes[node].parent = None;
        match self.min {
            Some(min) => {
                self.splice_before(min, node);
                if self.nodes[node].priority < self.nodes[min].priority {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }
    }

    fn insert(&mut self, element: E, priority: P) -> NodeKey {
        let key = self.nodes.insert_with_key(|key| Node {
            element,
            priority,
            parent: None,
            child: None,
            left: key,
            right: key,
            degree: 0,
        });
        self.add_root(key);
        key
    }

    /// Makes root `child` a child of root `parent`
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        self.unlink(child);
        self.nodes[child].parent = Some(parent);
        match self.nodes[parent].child {
            Some(first) => self.splice_before(first, child),
            None => self.nodes[parent].child = Some(child),
        }
        self.nodes[parent].degree += 1;
    }

    fn extract_min(&mut self) -> Option<(E, P)> {
        let z = self.min?;

        // Promote every child of z to the root ring
        if let Some(first) = self.nodes[z].child.take() {
            let mut children = Vec::with_capacity(self.nodes[z].degree);
            let mut current = first;
            loop {
                children.push(current);
                current = self.nodes[current].right;
                if current == first {
                    break;
                }
            }
            for child in children {
                self.unlink(child);
                self.nodes[child].parent = None;
                self.splice_before(z, child);
            }
        }

        let successor = self.nodes[z].right;
        self.unlink(z);
        let node = self.nodes.remove(z)?;

        if successor == z {
            self.min = None;
        } else {
            self.min = Some(successor);
            self.consolidate(successor);
        }
        Some((node.element, node.priority))
    }

    /// Links equal-degree roots until all root degrees differ, then rescans
    /// the surviving roots for the minimum
    fn consolidate(&mut self, start: NodeKey) {
        let mut roots = Vec::new();
        let mut current = start;
        loop {
            roots.push(current);
            current = self.nodes[current].right;
            if current == start {
                break;
            }
        }

        let mut by_degree: Vec<Option<NodeKey>> = vec![None; degree_bound(self.len()) + 1];
        for root in roots {
            let mut x = root;
            let mut d = self.nodes[x].degree;
            loop {
                if d >= by_degree.len() {
                    by_degree.resize(d + 1, None);
                }
                let Some(mut y) = by_degree[d].take() else {
                    break;
                };
                if self.nodes[y].priority < self.nodes[x].priority {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            by_degree[d] = Some(x);
        }

        self.min = None;
        for root in by_degree.into_iter().flatten() {
            if self
                .min
                .map_or(true, |m| self.nodes[root].priority < self.nodes[m].priority)
            {
                self.min = Some(root);
            }
        }
    }

    /// Moves `node` out of its parent's child ring into the root ring
    fn cut(&mut self, node: NodeKey, parent: NodeKey) {
        if self.nodes[parent].child == Some(node) {
            let right = self.nodes[node].right;
            self.nodes[parent].child = if right == node { None } else { Some(right) };
        }
        self.unlink(node);
        self.nodes[parent].degree -= 1;
        self.add_root(node);
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let Some(min) = self.min else {
            assert!(self.nodes.is_empty());
            return;
        };
        let mut count = 0;
        let mut current = min;
        loop {
            assert!(self.nodes[current].parent.is_none());
            assert!(self.nodes[min].priority <= self.nodes[current].priority);
            count += self.check_subtree(current);
            current = self.nodes[current].right;
            if current == min {
                break;
            }
        }
        assert_eq!(count, self.nodes.len());
    }

    #[cfg(test)]
    fn check_subtree(&self, key: NodeKey) -> usize {
        let node = &self.nodes[key];
        assert_eq!(self.nodes[node.left].right, key);
        assert_eq!(self.nodes[node.right].left, key);
        let mut size = 1;
        let mut degree = 0;
        if let Some(first) = node.child {
            let mut c = first;
            loop {
                assert_eq!(self.nodes[c].parent, Some(key));
                assert!(self.nodes[c].priority >= node.priority);
                size += self.check_subtree(c);
                degree += 1;
                c = self.nodes[c].right;
                if c == first {
                    break;
                }
            }
        }
        assert_eq!(degree, node.degree);
        size
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use comparative_heaps::PriorityQueue;
/// use comparative_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.add("item", 5);
/// heap.add("other", 1);
/// assert_eq!(heap.extract_min(), Ok(("other", 1)));
/// ```
pub struct FibonacciHeap<E, P> {
    forest: Forest<E, P>,
}

impl<E, P: Ord> FibonacciHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            forest: Forest::new(),
        }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for FibonacciHeap<E, P> {
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

impl<E, P: Ord> Default for FibonacciHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fibonacci heap with an element → node index
///
/// Nodes never change identity, so the index only changes on add and
/// extraction.
pub struct IndexedFibonacciHeap<E, P> {
    forest: Forest<E, P>,
    index: ElementIndex<E, NodeKey>,
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedFibonacciHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            forest: Forest::new(),
            index: ElementIndex::new(),
        }
    }
}

impl<E: Clone + Eq + Hash, P: Ord> PriorityQueue<E, P> for IndexedFibonacciHeap<E, P> {
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
        self.forest.nodes[key].priority = priority;

        match self.forest.nodes[key].parent {
            Some(parent) if self.forest.nodes[key].priority < self.forest.nodes[parent].priority => {
                self.forest.cut(key, parent);
            }
            Some(_) => {}
            None => {
                let min = self.forest.min;
                if min.map_or(true, |m| {
                    self.forest.nodes[key].priority < self.forest.nodes[m].priority
                }) {
                    self.forest.min = Some(key);
                }
            }
        }
        Ok(true)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedPriorityQueue<E, P> for IndexedFibonacciHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.index.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.index
            .get(element)
            .map(|key| &self.forest.nodes[key].priority)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> Default for IndexedFibonacciHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_bound() {
        assert_eq!(degree_bound(0), 1);
        assert_eq!(degree_bound(1), 1);
        assert_eq!(degree_bound(2), 2);
        // log_φ(1000) ≈ 14.35
        assert_eq!(degree_bound(1000), 15);
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());

        heap.add("a", 5);
        heap.add("b", 3);
        heap.add("c", 7);
        heap.forest.check_invariants();

        assert_eq!(heap.peek(), Some((&"b", &3)));
        assert_eq!(heap.extract_min(), Ok(("b", 3)));
        heap.forest.check_invariants();
        assert_eq!(heap.peek(), Some((&"a", &5)));
    }

    #[test]
    fn test_consolidation_leaves_distinct_degrees() {
        let mut heap = FibonacciHeap::new();
        for i in 0..33u32 {
            heap.add(i, i);
        }
        assert_eq!(heap.extract_min(), Ok((0, 0)));
        heap.forest.check_invariants();

        let min = heap.forest.min.unwrap();
        let mut degrees = Vec::new();
        let mut current = min;
        loop {
            degrees.push(heap.forest.nodes[current].degree);
            current = heap.forest.nodes[current].right;
            if current == min {
                break;
            }
        }
        let mut sorted = degrees.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), degrees.len());
        // 32 remaining nodes consolidate into a single tree of degree 5
        assert_eq!(degrees, vec![5]);
    }

    #[test]
    fn test_interleaved_operations() {
        let mut heap = FibonacciHeap::new();
        let mut expected = Vec::new();
        for round in 0..20u32 {
            for i in 0..10 {
                let p = (round * 31 + i * 17) % 97;
                heap.add(p, p);
                expected.push(p);
            }
            expected.sort_unstable();
            for _ in 0..5 {
                let (_, p) = heap.extract_min().unwrap();
                assert_eq!(p, expected.remove(0));
            }
            heap.forest.check_invariants();
        }
    }

    #[test]
    fn test_decrease_cuts_to_root() {
        let mut heap = IndexedFibonacciHeap::new();
        for i in 0..17u32 {
            heap.add(i, 100 + i);
        }
        // Force a consolidated tree
        assert_eq!(heap.extract_min(), Ok((0, 100)));
        heap.forest.check_invariants();

        assert_eq!(heap.decrease_priority(&16, 1), Ok(true));
        heap.forest.check_invariants();
        let key = heap.index.get(&16).unwrap();
        assert!(heap.forest.nodes[key].parent.is_none());
        assert_eq!(heap.peek(), Some((&16, &1)));

        assert_eq!(heap.decrease_priority(&16, 1), Ok(false));
        assert_eq!(heap.decrease_priority(&99, 0), Ok(false));

        assert_eq!(heap.extract_min(), Ok((16, 1)));
        heap.forest.check_invariants();
        for i in 1..16u32 {
            assert_eq!(heap.extract_min(), Ok((i, 100 + i)));
        }
    }

    #[test]
    fn test_decrease_without_violation_stays_child() {
        let mut heap = IndexedFibonacciHeap::new();
        for i in 0..5u32 {
            heap.add(i, i * 10);
        }
        heap.extract_min().unwrap();
        // 4 nodes, one tree rooted at element 1 (priority 10)
        assert_eq!(heap.decrease_priority(&4, 35), Ok(true));
        heap.forest.check_invariants();
        assert_eq!(heap.peek(), Some((&1, &10)));
    }
}
