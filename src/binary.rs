//! Binary heap implementations
//!
//! A straightforward array-backed binary min-heap in two flavours:
//!
//! - [`BinaryHeap`]: unindexed, accepts duplicate elements
//! - [`IndexedBinaryHeap`]: remembers the array position of every element so
//!   `decrease_priority` can sift up directly from it
//!
//! The backing `Vec` doubles its capacity when full.
//!
//! # Time Complexity
//!
//! | Operation           | Complexity |
//! |---------------------|------------|
//! | `add`               | O(log n)   |
//! | `extract_min`       | O(log n)   |
//! | `peek`              | O(1)       |
//! | `decrease_priority` | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::PriorityQueue;
//! use comparative_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! heap.add("three", 3);
//! heap.add("one", 1);
//! heap.add("two", 2);
//!
//! assert_eq!(heap.extract_min(), Ok(("one", 1)));
//! assert_eq!(heap.extract_min(), Ok(("two", 2)));
//! assert_eq!(heap.extract_min(), Ok(("three", 3)));
//! assert!(heap.extract_min().is_err());
//! ```

use crate::error::HeapError;
use crate::storage::ElementIndex;
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use std::hash::Hash;

/// A simple binary min-heap
///
/// This heap stores (element, priority) pairs and always returns a pair with
/// the minimum priority first. It does not support `decrease_priority`; use
/// [`IndexedBinaryHeap`] for that.
#[derive(Debug, Clone)]
pub struct BinaryHeap<E, P> {
    /// The heap data stored as a vector of (element, priority) pairs
    data: Vec<(E, P)>,
}

impl<E, P: Ord> BinaryHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty heap with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.data[index].1 < self.data[parent].1 {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.data[left].1 < self.data[smallest].1 {
                smallest = left;
            }
            if right < len && self.data[right].1 < self.data[smallest].1 {
                smallest = right;
            }

            if smallest != index {
                self.data.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for BinaryHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        self.data.push((element, priority));
        self.sift_up(self.data.len() - 1);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyStructure);
        }

        let last_idx = self.data.len() - 1;
        self.data.swap(0, last_idx);
        let result = self.data.pop().ok_or(HeapError::EmptyStructure)?;

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        Ok(result)
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.data.first().map(|(e, p)| (e, p))
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

impl<E, P: Ord> Default for BinaryHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary min-heap with an element → position index
///
/// Every swap performed while sifting also rewrites the positions of both
/// swapped elements, so the index is always exact.
#[derive(Debug)]
pub struct IndexedBinaryHeap<E, P> {
    data: Vec<(E, P)>,
    positions: ElementIndex<E, usize>,
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedBinaryHeap<E, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            positions: ElementIndex::new(),
        }
    }

    /// Creates an empty heap with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            positions: ElementIndex::new(),
        }
    }

    /// Swaps two slots and their index entries together
    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.positions.relocate(&self.data[a].0, a);
        self.positions.relocate(&self.data[b].0, b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.data[index].1 < self.data[parent].1 {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.data[left].1 < self.data[smallest].1 {
                smallest = left;
            }
            if right < len && self.data[right].1 < self.data[smallest].1 {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<E: Clone + Eq + Hash, P: Ord> PriorityQueue<E, P> for IndexedBinaryHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        if self.positions.contains(&element) {
            return false;
        }
        let at = self.data.len();
        self.positions.insert(element.clone(), at);
        self.data.push((element, priority));
        self.sift_up(at);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyStructure);
        }

        let last_idx = self.data.len() - 1;
        self.swap(0, last_idx);
        let (element, priority) = self.data.pop().ok_or(HeapError::EmptyStructure)?;
        self.positions.remove(&element);

        if !self.data.is_empty() {
            self.sift_down(0);
        }

        Ok((element, priority))
    }

    fn peek(&self) -> Option<(&E, &P)> {
        self.data.first().map(|(e, p)| (e, p))
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.positions.clear();
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let Some(at) = self.positions.get(element) else {
            return Ok(false);
        };
        if priority >= self.data[at].1 {
            return Ok(false);
        }
        self.data[at].1 = priority;
        self.sift_up(at);
        Ok(true)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedPriorityQueue<E, P> for IndexedBinaryHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.positions.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.positions.get(element).map(|at| &self.data[at].1)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> Default for IndexedBinaryHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_positions_exact<E: Clone + Eq + Hash + std::fmt::Debug, P: Ord>(
        heap: &IndexedBinaryHeap<E, P>,
    ) {
        assert_eq!(heap.positions.len(), heap.data.len());
        for (i, (element, _)) in heap.data.iter().enumerate() {
            assert_eq!(heap.positions.get(element), Some(i), "{element:?}");
        }
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = BinaryHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.add("three", 3);
        heap.add("one", 1);
        heap.add("two", 2);

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some((&"one", &1)));

        assert_eq!(heap.extract_min(), Ok(("one", 1)));
        assert_eq!(heap.extract_min(), Ok(("two", 2)));
        assert_eq!(heap.extract_min(), Ok(("three", 3)));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyStructure));
    }

    #[test]
    fn test_duplicate_elements_allowed() {
        let mut heap = BinaryHeap::new();

        assert!(heap.add("a", 1));
        assert!(heap.add("a", 1));
        assert!(heap.add("a", 1));
        assert_eq!(heap.len(), 3);

        for _ in 0..3 {
            assert_eq!(heap.extract_min(), Ok(("a", 1)));
        }
    }

    #[test]
    fn test_decrease_unsupported() {
        let mut heap = BinaryHeap::new();
        heap.add(1, 10);
        assert_eq!(
            heap.decrease_priority(&1, 0),
            Err(HeapError::UnsupportedOperation)
        );
        assert_eq!(heap.peek(), Some((&1, &10)));
    }

    #[test]
    fn test_ascending_and_descending_insertion() {
        let mut heap = BinaryHeap::with_capacity(4);
        for i in 0..100 {
            heap.add(i, i);
        }
        for i in (100..200).rev() {
            heap.add(i, i);
        }
        for i in 0..200 {
            assert_eq!(heap.extract_min(), Ok((i, i)));
        }
    }

    #[test]
    fn test_indexed_duplicate_add_is_noop() {
        let mut heap = IndexedBinaryHeap::new();
        assert!(heap.add("x", 5));
        assert!(!heap.add("x", 1));
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.priority_of(&"x"), Some(&5));
    }

    #[test]
    fn test_indexed_decrease_priority() {
        let mut heap = IndexedBinaryHeap::new();
        for i in 0..50u32 {
            heap.add(i, 1000 + i);
        }
        assert_positions_exact(&heap);

        assert_eq!(heap.decrease_priority(&49, 3), Ok(true));
        assert_eq!(heap.decrease_priority(&49, 3), Ok(false));
        assert_eq!(heap.decrease_priority(&49, 4), Ok(false));
        assert_eq!(heap.decrease_priority(&99, 0), Ok(false));
        assert_positions_exact(&heap);

        assert_eq!(heap.peek(), Some((&49, &3)));
        assert_eq!(heap.extract_min(), Ok((49, 3)));
        assert!(!heap.contains(&49));
        assert_positions_exact(&heap);

        let mut last = 0;
        while let Ok((_, p)) = heap.extract_min() {
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_indexed_clear() {
        let mut heap = IndexedBinaryHeap::new();
        heap.add(1, 1);
        heap.add(2, 2);
        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(&1));
        assert_eq!(heap.extract_min(), Err(HeapError::EmptyStructure));
        assert!(heap.add(1, 1));
    }
}
