//! Directed graph model consumed by the search
//!
//! Nodes are dense integer ids handed out by the graph. Each node keeps a list
//! of unique out-neighbours; adding an edge that already exists is a no-op.
//! Edge weights are kept apart from the topology in [`EdgeWeights`], so the
//! same graph can be searched under different weightings.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Stable identity of a node inside one [`DirectedGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Position of the node in its graph's node list
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Adjacency-list directed graph with unique out-edges
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    out_edges: Vec<Vec<NodeId>>,
    edge_set: FxHashSet<(NodeId, NodeId)>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with nodes `0..count` and no edges
    pub fn with_nodes(count: u32) -> Self {
        Self {
            out_edges: vec![Vec::new(); count as usize],
            edge_set: FxHashSet::default(),
        }
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.out_edges.len() as u32);
        self.out_edges.push(Vec::new());
        id
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.out_edges.len()
    }

    /// Adds the edge `from → to`
    ///
    /// Returns `false` when the edge already exists or either endpoint is
    /// not a node of this graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        if !self.edge_set.insert((from, to)) {
            return false;
        }
        self.out_edges[from.index()].push(to);
        true
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_set.contains(&(from, to))
    }

    /// Out-neighbours of `node`; empty for unknown nodes
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.out_edges
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.out_edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.out_edges.len() as u32).map(NodeId)
    }
}

/// One weight per directed edge
#[derive(Debug, Clone)]
pub struct EdgeWeights<W> {
    weights: FxHashMap<(NodeId, NodeId), W>,
}

impl<W: Copy> EdgeWeights<W> {
    pub fn new() -> Self {
        Self {
            weights: FxHashMap::default(),
        }
    }

    /// Sets the weight of `from → to`, returning the previous weight
    pub fn set(&mut self, from: NodeId, to: NodeId, weight: W) -> Option<W> {
        self.weights.insert((from, to), weight)
    }

    pub fn get(&self, from: NodeId, to: NodeId) -> Option<W> {
        self.weights.get(&(from, to)).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<W: Copy> Default for EdgeWeights<W> {
    fn default() -> Self {
        Self::new()
    }
}
