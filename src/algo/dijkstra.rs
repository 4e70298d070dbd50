//! Textbook Dijkstra over a weighted edge list.
//!
//! Not part of the hierarchy machinery, but the ground truth the customized
//! searches are checked against.

use crate::datastr::graph::*;
use crate::datastr::heap::{HeapKind, MinHeap};
use crate::util::permutation::{apply_permutation, sort_edges_by_tail_then_head};
use crate::util::{add_weights, edge_path_to_node_path};

pub struct Dijkstra {
    graph: EdgeListGraph,
    weights: Vec<Weight>,
    distances: Vec<Weight>,
    predecessors: Vec<EdgeId>,
    queue: MinHeap,
}

impl Dijkstra {
    /// Takes ownership of the graph and sorts its edges by `(tail, head)`,
    /// permuting the weights along, so the adjacency offsets can be built.
    pub fn new(mut graph: EdgeListGraph, weights: Vec<Weight>, heap_kind: HeapKind) -> Dijkstra {
        assert_eq!(graph.num_arcs(), weights.len());
        let mut tail = std::mem::take(&mut graph.tail);
        let p = sort_edges_by_tail_then_head(&mut tail, &graph.head);
        graph.head = apply_permutation(&p, &graph.head);
        graph.tail = tail;
        graph.build_first_out();
        let weights = apply_permutation(&p, &weights);

        let n = graph.num_nodes();
        Dijkstra {
            graph,
            weights,
            distances: vec![INFINITY; n],
            predecessors: vec![INVALID_ID; n],
            queue: MinHeap::new(heap_kind, n),
        }
    }

    /// Shortest distance from `source` to `target`, `INFINITY` if unreachable.
    /// Stops as soon as `target` is settled.
    pub fn distance(&mut self, source: NodeId, target: NodeId) -> Weight {
        self.distances.fill(INFINITY);
        self.predecessors.fill(INVALID_ID);
        self.queue.clear();
        self.distances[source as usize] = 0;
        self.queue.insert_or_update(0, source);

        while let Ok(node) = self.queue.delete_min() {
            if node == target {
                break;
            }
            let distance = self.distances[node as usize];
            for edge in self.graph.neighbor_edge_indices_usize(node) {
                let head = self.graph.head[edge];
                let new_distance = add_weights(distance, self.weights[edge]);
                if new_distance < self.distances[head as usize] {
                    self.distances[head as usize] = new_distance;
                    self.predecessors[head as usize] = edge as EdgeId;
                    self.queue.insert_or_update(new_distance, head);
                }
            }
        }
        self.distances[target as usize]
    }

    /// The node path of the most recent `distance` call, empty if unreachable.
    pub fn node_path(&self, source: NodeId, target: NodeId) -> Vec<NodeId> {
        if source == target {
            return vec![source];
        }
        if self.distances[target as usize] >= INFINITY {
            return Vec::new();
        }
        let mut edges = Vec::new();
        let mut node = target;
        while node != source {
            let edge = self.predecessors[node as usize];
            edges.push(edge);
            node = self.graph.tail[edge as usize];
        }
        edges.reverse();
        edge_path_to_node_path(&self.graph.tail, &self.graph.head, &edges)
    }
}
