//! Common traits for priority queue data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`PriorityQueue`]: Base trait implemented by every queue in the crate
//! - [`IndexedPriorityQueue`]: Extended trait for queues that keep a reverse
//!   index from element to record, which is what makes `decrease_priority` work
//!
//! Every implementation is a drop-in substitute behind [`PriorityQueue`];
//! the searches in [`crate::pathfinding`] are written only against these
//! traits.

use crate::error::HeapError;

/// Base trait for min-priority queues
///
/// Queues store `(element, priority)` records and always hand back a record
/// whose priority is no larger than any other record still present. Ties are
/// broken differently by different implementations.
///
/// The trait is object safe, so a `Box<dyn PriorityQueue<E, P>>` can stand in
/// for any concrete structure.
///
/// # Example
///
/// ```rust
/// use comparative_heaps::PriorityQueue;
/// use comparative_heaps::binary::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// heap.add("three", 3);
/// heap.add("one", 1);
/// heap.add("two", 2);
///
/// assert_eq!(heap.peek(), Some((&"one", &1)));
/// assert_eq!(heap.extract_min(), Ok(("one", 1)));
/// assert_eq!(heap.len(), 2);
/// ```
pub trait PriorityQueue<E, P: Ord> {
    /// Inserts `element` with the given priority
    ///
    /// Returns `true` if a record was created. Indexed queues return `false`
    /// and leave the queue untouched when `element` is already present.
    fn add(&mut self, element: E, priority: P) -> bool;

    /// Removes and returns a record with minimum priority
    ///
    /// # Errors
    /// Returns [`HeapError::EmptyStructure`] if the queue is empty.
    fn extract_min(&mut self) -> Result<(E, P), HeapError>;

    /// Returns a record with minimum priority without removing it
    fn peek(&self) -> Option<(&E, &P)>;

    /// Returns the number of records in the queue
    fn len(&self) -> usize;

    /// Returns true if the queue holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record
    fn clear(&mut self);

    /// Lowers the priority of an element already in the queue
    ///
    /// Returns `Ok(true)` if the priority was strictly improved and
    /// `Ok(false)` if `element` is absent or `priority` is not lower than its
    /// current priority; in both `false` cases the queue is unchanged.
    ///
    /// # Errors
    /// Unindexed queues keep no element index and return
    /// [`HeapError::UnsupportedOperation`].
    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        let _ = (element, priority);
        Err(HeapError::UnsupportedOperation)
    }
}

/// Priority queue with an element → record index
///
/// Indexed queues hold each element at most once. They override
/// [`PriorityQueue::decrease_priority`] and never return
/// [`HeapError::UnsupportedOperation`] from it.
///
/// # Example
///
/// ```rust
/// use comparative_heaps::{IndexedPriorityQueue, PriorityQueue};
/// use comparative_heaps::pairing::IndexedPairingHeap;
///
/// let mut heap = IndexedPairingHeap::new();
/// heap.add(1, 1);
/// heap.add(2, 2);
/// assert_eq!(heap.decrease_priority(&2, 0), Ok(true));
/// assert_eq!(heap.priority_of(&2), Some(&0));
/// assert_eq!(heap.extract_min(), Ok((2, 0)));
/// ```
pub trait IndexedPriorityQueue<E, P: Ord>: PriorityQueue<E, P> {
    /// Returns true if `element` currently has a record in the queue
    fn contains(&self, element: &E) -> bool;

    /// Returns the current priority of `element`, if present
    fn priority_of(&self, element: &E) -> Option<&P>;
}

impl<E, P: Ord, Q: PriorityQueue<E, P> + ?Sized> PriorityQueue<E, P> for Box<Q> {
    fn add(&mut self, element: E, priority: P) -> bool {
        (**self).add(element, priority)
    }

    fn extract_min(&mut self) -> Result<(E, P), HeapError> {
        (**self).extract_min()
    }

    fn peek(&self) -> Option<(&E, &P)> {
        (**self).peek()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn decrease_priority(&mut self, element: &E, priority: P) -> Result<bool, HeapError> {
        (**self).decrease_priority(element, priority)
    }
}

impl<E, P: Ord, Q: IndexedPriorityQueue<E, P> + ?Sized> IndexedPriorityQueue<E, P> for Box<Q> {
    fn contains(&self, element: &E) -> bool {
        (**self).contains(element)
    }

    fn priority_of(&self, element: &E) -> Option<&P> {
        (**self).priority_of(element)
    }
}
