//! d-ary heap implementations
//!
//! Generalises the binary heap to `d` children per slot. A wider node makes
//! the tree shallower, so `add` and `decrease_priority` sift through
//! O(log_d n) levels while `extract_min` compares up to `d` children per level.
//!
//! - [`DaryHeap`]: unindexed
//! - [`IndexedDaryHeap`]: keeps an element → position index
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::PriorityQueue;
//! use comparative_heaps::dary::DaryHeap;
//!
//! let mut heap = DaryHeap::with_arity(8).unwrap();
//! for (element, priority) in [(4, 4), (3, 3), (1, 1), (5, 5), (2, 2)] {
//!     heap.add(element, priority);
//! }
//! assert_eq!(heap.extract_min(), Ok((1, 1)));
//! ```

use crate::error::{ConfigError, HeapError};
use crate::storage::ElementIndex;
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use std::hash::Hash;

/// Arity used by [`DaryHeap::new`] and [`IndexedDaryHeap::new`]
pub const DEFAULT_ARITY: usize = 4;

fn check_arity(arity: usize) -> Result<usize, ConfigError> {
    if arity < 2 {
        Err(ConfigError::InvalidArity(arity))
    } else {
        Ok(arity)
    }
}

#[inline]
fn parent_of(index: usize, arity: usize) -> usize {
    (index - 1) / arity
}

/// Index of the smallest child of `index`, if it has any children
#[inline]
fn smallest_child<E, P: Ord>(data: &[(E, P)], index: usize, arity: usize) -> Option<usize> {
    let first = index * arity + 1;
    if first >= data.len() {
        return None;
    }
    let last = (first + arity).min(data.len());
    let mut best = first;
    for child in first + 1..last {
        if data[child].1 < data[best].1 {
            best = child;
        }
    }
    Some(best)
}

/// Unindexed d-ary min-heap
#[derive(Debug, Clone)]
pub struct DaryHeap<E, P> {
    data: Vec<(E, P)>,
    arity: usize,
}

impl<E, P: Ord> DaryHeap<E, P> {
    /// Creates a heap with [`DEFAULT_ARITY`] children per slot
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            arity: DEFAULT_ARITY,
        }
    }

    /// Creates a heap with `arity` children per slot
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidArity`] if `arity < 2`.
    pub fn with_arity(arity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            data: Vec::new(),
            arity: check_arity(arity)?,
        })
    }

    /// Number of children per slot
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent_of(index, self.arity);
            if self.data[index].1 >= self.data[parent].1 {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        while let Some(child) = smallest_child(&self.data, index, self.arity) {
            if self.data[child].1 >= self.data[index].1 {
                break;
            }
            self.data.swap(index, child);
            index = child;
        }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for DaryHeap<E, P> {
    fn add(&mut self, element: E, priority: P) -> bool {
        self.data.push((element, priority));
        self.sift_up(self.data.len() - 1);
        true
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyStructure);
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
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

impl<E, P: Ord> Default for DaryHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// d-ary min-heap with an element → position index
#[derive(Debug)]
pub struct IndexedDaryHeap<E, P> {
    data: Vec<(E, P)>,
    positions: ElementIndex<E, usize>,
    arity: usize,
}

impl<E: Clone + Eq + Hash, P: Ord> IndexedDaryHeap<E, P> {
    /// Creates a heap with [`DEFAULT_ARITY`] children per slot
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            positions: ElementIndex::new(),
            arity: DEFAULT_ARITY,
        }
    }

    /// Creates a heap with `arity` children per slot
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidArity`] if `arity < 2`.
    pub fn with_arity(arity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            data: Vec::new(),
            positions: ElementIndex::new(),
            arity: check_arity(arity)?,
        })
    }

    /// Number of children per slot
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.positions.relocate(&self.data[a].0, a);
        self.positions.relocate(&self.data[b].0, b);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent_of(index, self.arity);
            if self.data[index].1 >= self.data[parent].1 {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        while let Some(child) = smallest_child(&self.data, index, self.arity) {
            if self.data[child].1 >= self.data[index].1 {
                break;
            }
            self.swap(index, child);
            index = child;
        }
    }
}

impl<E: Clone + Eq + Hash, P: Ord> PriorityQueue<E, P> for IndexedDaryHeap<E, P> {
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
        let last = self.data.len() - 1;
        self.swap(0, last);
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

impl<E: Clone + Eq + Hash, P: Ord> IndexedPriorityQueue<E, P> for IndexedDaryHeap<E, P> {
    fn contains(&self, element: &E) -> bool {
        self.positions.contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        self.positions.get(element).map(|at| &self.data[at].1)
    }
}

impl<E: Clone + Eq + Hash, P: Ord> Default for IndexedDaryHeap<E, P> {
    fn default() -> Self {
        Self::new()
    }
}
