//! Dijkstra's shortest-path search over any priority queue in this crate
//!
//! The search is written once against [`PriorityQueue`] and runs unchanged on
//! every implementation, which makes it a practical cross-check of the
//! queues: for a fixed graph and query they must all report the same
//! shortest distance.
//!
//! Two drivers exist:
//!
//! - [`Dijkstra`] works with any queue. A node whose distance improves is
//!   simply added again; outdated copies are skipped when they are popped
//!   because the node is already settled.
//! - [`IndexedDijkstra`] requires an [`IndexedPriorityQueue`] and lowers a
//!   queued node's priority in place with `decrease_priority`, so every node
//!   is queued at most once.
//!
//! Both reuse the queue they were built with and clear it before each query.
//!
//! # Example
//!
//! ```rust
//! use comparative_heaps::graph::{DirectedGraph, EdgeWeights, NodeId};
//! use comparative_heaps::pathfinding::Dijkstra;
//! use comparative_heaps::pairing::PairingHeap;
//!
//! let mut graph = DirectedGraph::with_nodes(3);
//! let mut weights = EdgeWeights::new();
//! let (a, b, c) = (NodeId::new(0), NodeId::new(1), NodeId::new(2));
//! for (from, to, w) in [(a, b, 1u32), (b, c, 1), (a, c, 5)] {
//!     graph.add_edge(from, to);
//!     weights.set(from, to, w);
//! }
//!
//! let mut search = Dijkstra::new(PairingHeap::new());
//! let weight = |from, to| weights.get(from, to).unwrap_or(u32::MAX);
//! assert_eq!(search.shortest_path(&graph, a, c, weight), Some((vec![a, b, c], 2)));
//! ```

use crate::error::HeapError;
use crate::graph::{DirectedGraph, NodeId};
use crate::traits::{IndexedPriorityQueue, PriorityQueue};
use crate::weight::Weight;
use rustc_hash::{FxHashMap, FxHashSet};

/// Per-query bookkeeping shared by both drivers
struct SearchState<W> {
    /// Best known distance of every discovered node
    distances: FxHashMap<NodeId, W>,
    /// Predecessor on the best known path
    came_from: FxHashMap<NodeId, NodeId>,
    /// Nodes whose distance is final
    closed: FxHashSet<NodeId>,
}

impl<W: Weight> SearchState<W> {
    fn new(source: NodeId) -> Self {
        let mut distances = FxHashMap::default();
        distances.insert(source, W::zero());
        Self {
            distances,
            came_from: FxHashMap::default(),
            closed: FxHashSet::default(),
        }
    }

    /// Marks `node` settled; `false` if it already was
    fn settle(&mut self, node: NodeId) -> bool {
        self.closed.insert(node)
    }

    fn settled(&self) -> usize {
        self.closed.len()
    }

    /// Records a tentative distance if it beats the known one
    fn improve(&mut self, node: NodeId, via: NodeId, distance: W) -> Relaxation {
        match self.distances.get(&node) {
            Some(&known) if distance >= known => Relaxation::NoImprovement,
            known => {
                let discovered = known.is_none();
                self.distances.insert(node, distance);
                self.came_from.insert(node, via);
                if discovered {
                    Relaxation::Discovered
                } else {
                    Relaxation::Improved
                }
            }
        }
    }

    /// Reconstructs the path ending at `target` from the predecessor map
    fn reconstruct_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = target;
        while let Some(&previous) = self.came_from.get(&current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

enum Relaxation {
    Discovered,
    Improved,
    NoImprovement,
}

fn exceeds<W: Weight>(limit: Option<W>, distance: W) -> bool {
    limit.map_or(false, |max| distance > max)
}

/// Dijkstra search over an unindexed (or indexed) priority queue
///
/// Builder-style limits:
/// - [`max_cost`](Dijkstra::max_cost): ignore paths longer than this
/// - [`max_settled`](Dijkstra::max_settled): give up after settling this many
///   nodes
pub struct Dijkstra<Q, W> {
    queue: Q,
    max_cost: Option<W>,
    max_settled: Option<usize>,
}

impl<Q, W> Dijkstra<Q, W>
where
    Q: PriorityQueue<NodeId, W>,
    W: Weight,
{
    /// Creates a search that will use `queue` as its frontier
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            max_cost: None,
            max_settled: None,
        }
    }

    /// Sets the maximum path cost to explore.
    pub fn max_cost(mut self, cost: W) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Sets the maximum number of nodes to settle.
    pub fn max_settled(mut self, count: usize) -> Self {
        self.max_settled = Some(count);
        self
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn into_queue(self) -> Q {
        self.queue
    }

    /// Queues `node` at `distance`, lowering its record if the queue already
    /// holds one (indexed queues reject a second add of the same element)
    fn enqueue(&mut self, node: NodeId, distance: W) {
        if !self.queue.add(node, distance) {
            // a rejected add only comes from an indexed queue, which supports decrease
            let _ = self.queue.decrease_priority(&node, distance);
        }
    }

    /// Finds a shortest path from `source` to `target`
    ///
    /// Returns the node sequence (both ends included) and its total weight,
    /// or `None` if `target` cannot be reached within the configured limits.
    pub fn shortest_path<F>(
        &mut self,
        graph: &DirectedGraph,
        source: NodeId,
        target: NodeId,
        weight: F,
    ) -> Option<(Vec<NodeId>, W)>
    where
        F: Fn(NodeId, NodeId) -> W,
    {
        tracing::debug!("dijkstra search from {} to {}", source, target);
        self.queue.clear();
        let mut state = SearchState::new(source);
        self.queue.add(source, W::zero());

        while let Ok((node, distance)) = self.queue.extract_min() {
            if !state.settle(node) {
                continue;
            }
            if self.max_settled.map_or(false, |max| state.settled() > max) {
                tracing::debug!("dijkstra gave up after settling {} nodes", state.settled() - 1);
                return None;
            }
            if node == target {
                tracing::debug!("dijkstra reached {} at {:?} after settling {} nodes", target, distance, state.settled());
                return Some((state.reconstruct_path(target), distance));
            }
            for &next in graph.successors(node) {
                if state.closed.contains(&next) {
                    continue;
                }
                let candidate = distance.plus(weight(node, next));
                if exceeds(self.max_cost, candidate) {
                    continue;
                }
                match state.improve(next, node, candidate) {
                    Relaxation::Discovered | Relaxation::Improved => self.enqueue(next, candidate),
                    Relaxation::NoImprovement => {}
                }
            }
        }

        tracing::debug!("dijkstra found no path to {} after settling {} nodes", target, state.settled());
        None
    }

    /// Node sequence of a shortest path, empty if `target` is unreachable
    pub fn search<F>(&mut self, graph: &DirectedGraph, source: NodeId, target: NodeId, weight: F) -> Vec<NodeId>
    where
        F: Fn(NodeId, NodeId) -> W,
    {
        self.shortest_path(graph, source, target, weight)
            .map(|(path, _)| path)
            .unwrap_or_default()
    }

    /// Returns every node whose shortest distance from `source` is at most
    /// `budget`, with that distance, in the order they were settled.
    ///
    /// This is useful for "what's nearby" queries.
    pub fn reachable_within<F>(&mut self, graph: &DirectedGraph, source: NodeId, budget: W, weight: F) -> Vec<(NodeId, W)>
    where
        F: Fn(NodeId, NodeId) -> W,
    {
        self.queue.clear();
        let mut state = SearchState::new(source);
        let mut result = Vec::new();
        self.queue.add(source, W::zero());

        while let Ok((node, distance)) = self.queue.extract_min() {
            if !state.settle(node) {
                continue;
            }
            result.push((node, distance));
            for &next in graph.successors(node) {
                if state.closed.contains(&next) {
                    continue;
                }
                let candidate = distance.plus(weight(node, next));
                if candidate > budget {
                    continue;
                }
                if let Relaxation::Discovered | Relaxation::Improved = state.improve(next, node, candidate) {
                    self.enqueue(next, candidate);
                }
            }
        }

        result
    }
}

/// Dijkstra search that lowers queued priorities in place
///
/// Only indexed queues can back this search; the bound on
/// [`IndexedPriorityQueue`] rejects the others at compile time.
pub struct IndexedDijkstra<Q, W> {
    queue: Q,
    max_cost: Option<W>,
    max_settled: Option<usize>,
}

impl<Q, W> IndexedDijkstra<Q, W>
where
    Q: IndexedPriorityQueue<NodeId, W>,
    W: Weight,
{
    /// Creates a search that will use `queue` as its frontier
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            max_cost: None,
            max_settled: None,
        }
    }

    /// Sets the maximum path cost to explore.
    pub fn max_cost(mut self, cost: W) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Sets the maximum number of nodes to settle.
    pub fn max_settled(mut self, count: usize) -> Self {
        self.max_settled = Some(count);
        self
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn into_queue(self) -> Q {
        self.queue
    }

    /// Finds a shortest path from `source` to `target`
    ///
    /// # Errors
    /// Propagates a [`HeapError`] from the queue's `decrease_priority`; an
    /// indexed queue never reports one for a queued element.
    pub fn shortest_path<F>(
        &mut self,
        graph: &DirectedGraph,
        source: NodeId,
        target: NodeId,
        weight: F,
    ) -> Result<Option<(Vec<NodeId>, W)>, HeapError>
    where
        F: Fn(NodeId, NodeId) -> W,
    {
        tracing::debug!("indexed dijkstra search from {} to {}", source, target);
        self.queue.clear();
        let mut state = SearchState::new(source);
        self.queue.add(source, W::zero());

        while let Ok((node, distance)) = self.queue.extract_min() {
            if !state.settle(node) {
                continue;
            }
            if self.max_settled.map_or(false, |max| state.settled() > max) {
                tracing::debug!("indexed dijkstra gave up after settling {} nodes", state.settled() - 1);
                return Ok(None);
            }
            if node == target {
                tracing::debug!(
                    "indexed dijkstra reached {} at {:?} after settling {} nodes",
                    target,
                    distance,
                    state.settled()
                );
                return Ok(Some((state.reconstruct_path(target), distance)));
            }
            for &next in graph.successors(node) {
                if state.closed.contains(&next) {
                    continue;
                }
                let candidate = distance.plus(weight(node, next));
                if exceeds(self.max_cost, candidate) {
                    continue;
                }
                match state.improve(next, node, candidate) {
                    Relaxation::Discovered => {
                        self.queue.add(next, candidate);
                    }
                    Relaxation::Improved => {
                        self.queue.decrease_priority(&next, candidate)?;
                    }
                    Relaxation::NoImprovement => {}
                }
            }
        }

        tracing::debug!(
            "indexed dijkstra found no path to {} after settling {} nodes",
            target,
            state.settled()
        );
        Ok(None)
    }

    /// Node sequence of a shortest path, empty if `target` is unreachable
    ///
    /// # Errors
    /// See [`IndexedDijkstra::shortest_path`].
    pub fn search<F>(
        &mut self,
        graph: &DirectedGraph,
        source: NodeId,
        target: NodeId,
        weight: F,
    ) -> Result<Vec<NodeId>, HeapError>
    where
        F: Fn(NodeId, NodeId) -> W,
    {
        Ok(self
            .shortest_path(graph, source, target, weight)?
            .map(|(path, _)| path)
            .unwrap_or_default())
    }
}

/// Total weight of consecutive edges along `path`
///
/// An empty or single-node path costs [`Weight::zero`].
pub fn path_cost<W, F>(path: &[NodeId], weight: F) -> W
where
    W: Weight,
    F: Fn(NodeId, NodeId) -> W,
{
    path.windows(2)
        .fold(W::zero(), |total, edge| total.plus(weight(edge[0], edge[1])))
}
