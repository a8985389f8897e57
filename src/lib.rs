//! Interchangeable Min-Priority Queues for Rust
//!
//! This crate provides a family of min-priority queues behind one trait, and a
//! Dijkstra shortest-path search written once against that trait so every
//! queue can drive it and be compared against the others.
//!
//! # Queues
//!
//! Each structure comes in an unindexed form and an indexed form. The indexed
//! form keeps a reverse index from element to record, rejects duplicate
//! elements and supports `decrease_priority`.
//!
//! - **Binary Heap**: O(log n) add and extract-min; O(log n) decrease
//! - **D-ary Heap**: configurable fan-out; O(log_d n) add and decrease
//! - **Binomial Heap**: O(log n) add, extract-min and decrease
//! - **Fibonacci Heap**: O(1) add and decrease; O(log n) amortized extract-min
//! - **Pairing Heap**: O(1) add; O(log n) amortized extract-min
//! - **AVL Tree Heap**: balanced search tree keyed by priority
//! - **B-Tree Heap**: B-tree of configurable minimum degree keyed by priority
//! - **van Emde Boas Heap**: O(log log U) operations over integer priorities
//! - **Dial Heap**: bucket queue for non-negative integer or double priorities
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::fibonacci::IndexedFibonacciHeap;
//! use comparative_heaps::{IndexedPriorityQueue, PriorityQueue};
//!
//! let mut heap = IndexedFibonacciHeap::new();
//! heap.add("item1", 5);
//! heap.add("item2", 3);
//! assert_eq!(heap.decrease_priority(&"item1", 1), Ok(true));
//! assert_eq!(heap.peek(), Some((&"item1", &1)));
//! ```

pub mod avl;
pub mod binary;
pub mod binomial;
pub mod btree;
mod chain;
pub mod dary;
pub mod dial;
pub mod error;
pub mod fibonacci;
pub mod graph;
pub mod map_heap;
pub mod pairing;
pub mod pathfinding;
mod storage;
pub mod traits;
pub mod veb;
pub mod weight;

// Re-export the main traits for convenience
pub use error::{ConfigError, HeapError};
pub use graph::{DirectedGraph, EdgeWeights, NodeId};
pub use pathfinding::{Dijkstra, IndexedDijkstra};
pub use traits::{IndexedPriorityQueue, PriorityQueue};
pub use weight::Weight;
