//! Edge list based graph representation.
//!
//! Nodes and edges are identified by ids going from `0` to `n-1` and `m-1` respectively,
//! where `n` is the number of nodes and `m` the number of directed edges.
//! The graph is stored as two parallel collections `tail` and `head` with one entry per edge,
//! plus CSR style adjacency offsets `first_out` with `n+1` entries.
//! `first_out` is only valid while the edge list is sorted by `tail`;
//! `head[first_out[x]..first_out[x + 1]]` then contains all neighbors of `x`.

use crate::util::filter::{remove_filtered, Filter};
use std::ops::Range;

/// Node ids are 32bit unsigned ints
pub type NodeId = u32;
/// Edge ids are 32bit unsigned ints
pub type EdgeId = u32;
/// Weights are 32bit unsigned ints
pub type Weight = u32;

/// A sufficiently large infinity constant.
/// Set to `u32::MAX / 2` so that `INFINITY + x` for `x <= INFINITY` does not overflow.
pub const INFINITY: Weight = u32::MAX / 2;
/// Sentinel for "no node" / "no edge".
pub const INVALID_ID: u32 = u32::MAX;

/// Base trait for graphs.
pub trait Graph {
    fn num_nodes(&self) -> usize;
    fn num_arcs(&self) -> usize;
    fn degree(&self, node: NodeId) -> usize;
}

/// A directed graph as two parallel edge arrays with optional CSR adjacency offsets.
///
/// This is the exchange format for ingestion (edges in arbitrary order, no offsets)
/// as well as the representation of the contracted upward and downward graphs
/// (edges sorted by `(tail, head)`, offsets built).
#[derive(Debug, Clone, Default)]
pub struct EdgeListGraph {
    pub tail: Vec<NodeId>,
    pub head: Vec<NodeId>,
    pub first_out: Vec<EdgeId>,
    node_count: usize,
}

impl EdgeListGraph {
    pub fn new(node_count: usize) -> Self {
        assert!(node_count < NodeId::MAX as usize);
        EdgeListGraph {
            tail: Vec::new(),
            head: Vec::new(),
            first_out: Vec::new(),
            node_count,
        }
    }

    pub fn from_edges(node_count: usize, tail: Vec<NodeId>, head: Vec<NodeId>) -> Self {
        assert_eq!(tail.len(), head.len());
        assert!(tail.len() < EdgeId::MAX as usize);
        debug_assert!(tail.iter().chain(head.iter()).all(|&node| (node as usize) < node_count));
        EdgeListGraph {
            tail,
            head,
            first_out: Vec::new(),
            node_count,
        }
    }

    pub fn add_edge(&mut self, tail: NodeId, head: NodeId) {
        debug_assert!((tail as usize) < self.node_count);
        debug_assert!((head as usize) < self.node_count);
        self.tail.push(tail);
        self.head.push(head);
    }

    pub fn set_node_count(&mut self, node_count: usize) {
        self.node_count = node_count;
    }

    /// Find the id of an edge between `tail` and `head` in either orientation, if one exists.
    /// Linear scan, meant for tests and small graphs.
    pub fn edge_index(&self, tail: NodeId, head: NodeId) -> Option<EdgeId> {
        self.tail
            .iter()
            .zip(self.head.iter())
            .position(|(&t, &h)| (t == tail && h == head) || (t == head && h == tail))
            .map(|pos| pos as EdgeId)
    }

    /// Build the CSR adjacency offsets by counting edges per tail node.
    /// The edge list has to be sorted by tail.
    pub fn build_first_out(&mut self) {
        debug_assert!(self.tail.windows(2).all(|w| w[0] <= w[1]), "edges must be sorted by tail");
        let mut first_out = vec![0 as EdgeId; self.node_count + 1];
        for &tail in &self.tail {
            first_out[tail as usize + 1] += 1;
        }
        for node in 0..self.node_count {
            first_out[node + 1] += first_out[node];
        }
        self.first_out = first_out;
    }

    /// The range of edge ids which make up the outgoing edges of `node`.
    /// Only valid once `build_first_out` ran.
    #[inline]
    pub fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        (self.first_out[node as usize])..(self.first_out[node as usize + 1])
    }

    #[inline]
    pub fn neighbor_edge_indices_usize(&self, node: NodeId) -> Range<usize> {
        let range = self.neighbor_edge_indices(node);
        (range.start as usize)..(range.end as usize)
    }

    /// The heads of all outgoing edges of `node`, ascending when sorted by `(tail, head)`.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.head[self.neighbor_edge_indices_usize(node)]
    }

    /// Remove all edges marked `true` in the filter and rebuild the adjacency offsets.
    /// Surviving edges keep their relative order, so their ids shift down densely.
    pub fn remove_edges(&mut self, remove_edge_filter: &Filter) {
        assert_eq!(remove_edge_filter.len(), self.num_arcs());
        remove_filtered(&mut self.tail, remove_edge_filter);
        remove_filtered(&mut self.head, remove_edge_filter);
        self.build_first_out();
    }
}

impl Graph for EdgeListGraph {
    fn num_nodes(&self) -> usize {
        self.node_count
    }

    fn num_arcs(&self) -> usize {
        self.tail.len()
    }

    fn degree(&self, node: NodeId) -> usize {
        let node = node as usize;
        (self.first_out[node + 1] - self.first_out[node]) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_out_construction() {
        let mut graph = EdgeListGraph::from_edges(5, vec![0, 0, 1, 3, 3], vec![1, 2, 2, 0, 4]);
        graph.build_first_out();
        assert_eq!(graph.first_out, vec![0, 2, 3, 3, 5, 5]);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(2), &[] as &[NodeId]);
        assert_eq!(graph.degree(3), 2);
    }

    #[test]
    fn test_edge_index_finds_either_orientation() {
        let graph = EdgeListGraph::from_edges(3, vec![0, 1], vec![1, 2]);
        assert_eq!(graph.edge_index(0, 1), Some(0));
        assert_eq!(graph.edge_index(1, 0), Some(0));
        assert_eq!(graph.edge_index(2, 1), Some(1));
        assert_eq!(graph.edge_index(0, 2), None);
    }

    #[test]
    fn test_remove_edges() {
        let mut graph = EdgeListGraph::from_edges(4, vec![0, 0, 1, 2], vec![1, 2, 2, 3]);
        graph.build_first_out();
        graph.remove_edges(&vec![false, true, false, false]);
        assert_eq!(graph.tail, vec![0, 1, 2]);
        assert_eq!(graph.head, vec![1, 2, 3]);
        assert_eq!(graph.first_out, vec![0, 1, 2, 3, 3]);
    }
}
