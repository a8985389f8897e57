//! Queue fixtures shared by the integration tests
//!
//! Every queue in the crate, boxed behind the common traits, so a test can run
//! one script against all of them and compare the answers.

#![allow(dead_code)]

use comparative_heaps::avl::{AvlTreeHeap, IndexedAvlTreeHeap};
use comparative_heaps::binary::{BinaryHeap, IndexedBinaryHeap};
use comparative_heaps::binomial::{BinomialHeap, IndexedBinomialHeap};
use comparative_heaps::btree::{BTreeHeap, IndexedBTreeHeap};
use comparative_heaps::dary::{DaryHeap, IndexedDaryHeap};
use comparative_heaps::dial::{DialHeap, IndexedDialHeap};
use comparative_heaps::fibonacci::{FibonacciHeap, IndexedFibonacciHeap};
use comparative_heaps::pairing::{IndexedPairingHeap, PairingHeap};
use comparative_heaps::veb::{IndexedVebTreeHeap, VebTreeHeap};
use comparative_heaps::{IndexedPriorityQueue, PriorityQueue};
use std::hash::Hash;

pub type BoxedQueue<E> = Box<dyn PriorityQueue<E, u32>>;
pub type BoxedIndexedQueue<E> = Box<dyn IndexedPriorityQueue<E, u32>>;

/// One of every unindexed queue; the vEB heap accepts priorities below `universe`
pub fn unindexed_queues<E: 'static>(universe: u64) -> Vec<(&'static str, BoxedQueue<E>)> {
    vec![
        ("binary", Box::new(BinaryHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("dary-2", Box::new(DaryHeap::<E, u32>::with_arity(2).unwrap()) as BoxedQueue<E>),
        ("dary-4", Box::new(DaryHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("dary-7", Box::new(DaryHeap::<E, u32>::with_arity(7).unwrap()) as BoxedQueue<E>),
        ("binomial", Box::new(BinomialHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("fibonacci", Box::new(FibonacciHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("pairing", Box::new(PairingHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("avl", Box::new(AvlTreeHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("btree", Box::new(BTreeHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("btree-2", Box::new(BTreeHeap::<E, u32>::with_min_degree(2).unwrap()) as BoxedQueue<E>),
        ("veb", Box::new(VebTreeHeap::<E, u32>::with_universe(universe).unwrap()) as BoxedQueue<E>),
        ("dial", Box::new(DialHeap::<E, u32>::new()) as BoxedQueue<E>),
        ("dial-16", Box::new(DialHeap::<E, u32>::with_width(16).unwrap()) as BoxedQueue<E>),
    ]
}

/// One of every indexed queue; the vEB heap accepts priorities below `universe`
pub fn indexed_queues<E>(universe: u64) -> Vec<(&'static str, BoxedIndexedQueue<E>)>
where
    E: Clone + Eq + Hash + 'static,
{
    vec![
        ("binary", Box::new(IndexedBinaryHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("dary-2", Box::new(IndexedDaryHeap::<E, u32>::with_arity(2).unwrap()) as BoxedIndexedQueue<E>),
        ("dary-4", Box::new(IndexedDaryHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("dary-7", Box::new(IndexedDaryHeap::<E, u32>::with_arity(7).unwrap()) as BoxedIndexedQueue<E>),
        ("binomial", Box::new(IndexedBinomialHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("fibonacci", Box::new(IndexedFibonacciHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("pairing", Box::new(IndexedPairingHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("avl", Box::new(IndexedAvlTreeHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("btree", Box::new(IndexedBTreeHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("btree-2", Box::new(IndexedBTreeHeap::<E, u32>::with_min_degree(2).unwrap()) as BoxedIndexedQueue<E>),
        ("veb", Box::new(IndexedVebTreeHeap::<E, u32>::with_universe(universe).unwrap()) as BoxedIndexedQueue<E>),
        ("dial", Box::new(IndexedDialHeap::<E, u32>::new()) as BoxedIndexedQueue<E>),
        ("dial-16", Box::new(IndexedDialHeap::<E, u32>::with_width(16).unwrap()) as BoxedIndexedQueue<E>),
    ]
}

/// Removes every record, in extraction order
pub fn drain<E, Q: PriorityQueue<E, u32> + ?Sized>(queue: &mut Q) -> Vec<(E, u32)> {
    let mut out = Vec::with_capacity(queue.len());
    while let Ok(record) = queue.extract_min() {
        out.push(record);
    }
    out
}
