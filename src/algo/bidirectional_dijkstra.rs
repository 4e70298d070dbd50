//! Bidirectional label-setting search on a customized upward graph.
//!
//! Both directions climb the upward graph: the forward search uses the forward
//! weights starting at the source rank, the backward search uses the backward
//! weights starting at the target rank. The searches can only meet at common
//! higher ranked nodes, so a side keeps running exactly while its smallest
//! queue key is below the best meeting distance found so far.

use crate::algo::cch::CchGraph;
use crate::datastr::graph::*;
use crate::datastr::heap::{HeapKind, MinHeap};
use crate::util::add_weights;

pub struct BiDirectionalDijkstra<'a> {
    graph: CchGraph<'a>,
    forward_queue: MinHeap,
    backward_queue: MinHeap,
    forward_distance: Vec<Weight>,
    backward_distance: Vec<Weight>,
    forward_predecessor: Vec<NodeId>,
    backward_predecessor: Vec<NodeId>,
    meeting_node: NodeId,
    tentative_distance: Weight,
    num_settled_nodes: u64,
    num_relaxed_edges: u64,
}

impl<'a> BiDirectionalDijkstra<'a> {
    pub fn new(graph: CchGraph<'a>, heap_kind: HeapKind) -> BiDirectionalDijkstra<'a> {
        let n = graph.num_nodes();
        BiDirectionalDijkstra {
            graph,
            forward_queue: MinHeap::new(heap_kind, n),
            backward_queue: MinHeap::new(heap_kind, n),
            forward_distance: vec![INFINITY; n],
            backward_distance: vec![INFINITY; n],
            forward_predecessor: vec![INVALID_ID; n],
            backward_predecessor: vec![INVALID_ID; n],
            meeting_node: INVALID_ID,
            tentative_distance: INFINITY,
            num_settled_nodes: 0,
            num_relaxed_edges: 0,
        }
    }

    /// Run a query between two ranks. Returns the shortest distance,
    /// `INFINITY` if the target is unreachable.
    pub fn run(&mut self, source: NodeId, target: NodeId) -> Weight {
        self.forward_distance.fill(INFINITY);
        self.backward_distance.fill(INFINITY);
        self.forward_predecessor.fill(INVALID_ID);
        self.backward_predecessor.fill(INVALID_ID);
        self.forward_queue.clear();
        self.backward_queue.clear();
        self.meeting_node = INVALID_ID;
        self.tentative_distance = INFINITY;
        self.num_settled_nodes = 0;
        self.num_relaxed_edges = 0;

        self.forward_distance[source as usize] = 0;
        self.backward_distance[target as usize] = 0;
        if source == target {
            self.meeting_node = source;
            self.tentative_distance = 0;
            return 0;
        }
        self.forward_queue.insert_or_update(0, source);
        self.backward_queue.insert_or_update(0, target);

        loop {
            let forward_key = self.forward_queue.peek().ok().filter(|&key| key < self.tentative_distance);
            let backward_key = self.backward_queue.peek().ok().filter(|&key| key < self.tentative_distance);
            match (forward_key, backward_key) {
                (None, None) => break,
                (Some(_), None) => self.settle_forward(),
                (None, Some(_)) => self.settle_backward(),
                (Some(forward), Some(backward)) => {
                    if forward <= backward {
                        self.settle_forward()
                    } else {
                        self.settle_backward()
                    }
                }
            }
        }
        self.tentative_distance
    }

    fn settle_forward(&mut self) {
        Self::settle(
            self.graph.upward,
            self.graph.forward_weights,
            &mut self.forward_queue,
            &mut self.forward_distance,
            &mut self.forward_predecessor,
            &self.backward_distance,
            &mut self.tentative_distance,
            &mut self.meeting_node,
            &mut self.num_settled_nodes,
            &mut self.num_relaxed_edges,
        );
    }

    fn settle_backward(&mut self) {
        Self::settle(
            self.graph.upward,
            self.graph.backward_weights,
            &mut self.backward_queue,
            &mut self.backward_distance,
            &mut self.backward_predecessor,
            &self.forward_distance,
            &mut self.tentative_distance,
            &mut self.meeting_node,
            &mut self.num_settled_nodes,
            &mut self.num_relaxed_edges,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn settle(
        upward: &EdgeListGraph,
        weights: &[Weight],
        queue: &mut MinHeap,
        distances: &mut [Weight],
        predecessors: &mut [NodeId],
        opposite_distances: &[Weight],
        tentative_distance: &mut Weight,
        meeting_node: &mut NodeId,
        num_settled_nodes: &mut u64,
        num_relaxed_edges: &mut u64,
    ) {
        let node = match queue.delete_min() {
            Ok(node) => node,
            Err(_) => return,
        };
        *num_settled_nodes += 1;
        let distance = distances[node as usize];
        for edge in upward.neighbor_edge_indices_usize(node) {
            let weight = weights[edge];
            if weight >= INFINITY {
                continue;
            }
            *num_relaxed_edges += 1;
            let head = upward.head[edge];
            let new_distance = add_weights(distance, weight);
            if new_distance < distances[head as usize] {
                distances[head as usize] = new_distance;
                predecessors[head as usize] = node;
                queue.insert_or_update(new_distance, head);
                let candidate = add_weights(new_distance, opposite_distances[head as usize]);
                if candidate < *tentative_distance {
                    *tentative_distance = candidate;
                    *meeting_node = head;
                }
            }
        }
    }

    /// The distance of the most recent query.
    pub fn distance(&self) -> Weight {
        self.tentative_distance
    }

    /// The rank both searches met at, `INVALID_ID` if the target was unreachable.
    pub fn meeting_node(&self) -> NodeId {
        self.meeting_node
    }

    pub fn forward_distance(&self, node: NodeId) -> Weight {
        self.forward_distance[node as usize]
    }

    pub fn backward_distance(&self, node: NodeId) -> Weight {
        self.backward_distance[node as usize]
    }

    pub fn forward_predecessor(&self, node: NodeId) -> NodeId {
        self.forward_predecessor[node as usize]
    }

    pub fn backward_predecessor(&self, node: NodeId) -> NodeId {
        self.backward_predecessor[node as usize]
    }

    pub fn num_settled_nodes(&self) -> u64 {
        self.num_settled_nodes
    }

    pub fn num_relaxed_edges(&self) -> u64 {
        self.num_relaxed_edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upward_path_graph() -> EdgeListGraph {
        // ranks 0 and 1 both connected upward to rank 2
        let mut graph = EdgeListGraph::from_edges(3, vec![0, 1], vec![2, 2]);
        graph.build_first_out();
        graph
    }

    #[test]
    fn test_meets_at_the_apex() {
        let upward = upward_path_graph();
        let forward_weights = vec![3, 10];
        let backward_weights = vec![10, 4];
        let graph = CchGraph {
            upward: &upward,
            forward_weights: &forward_weights,
            backward_weights: &backward_weights,
        };
        let mut search = BiDirectionalDijkstra::new(graph, HeapKind::Binary);
        assert_eq!(search.run(0, 1), 7);
        assert_eq!(search.meeting_node(), 2);
        assert_eq!(search.forward_predecessor(2), 0);
        assert_eq!(search.backward_predecessor(2), 1);
    }

    #[test]
    fn test_infinity_edges_are_not_relaxed() {
        let upward = upward_path_graph();
        let forward_weights = vec![INFINITY, 10];
        let backward_weights = vec![10, 4];
        let graph = CchGraph {
            upward: &upward,
            forward_weights: &forward_weights,
            backward_weights: &backward_weights,
        };
        let mut search = BiDirectionalDijkstra::new(graph, HeapKind::Pairing);
        assert_eq!(search.run(0, 1), INFINITY);
        assert_eq!(search.meeting_node(), INVALID_ID);
        assert_eq!(search.num_relaxed_edges(), 1);
    }

    #[test]
    fn test_source_equals_target() {
        let upward = upward_path_graph();
        let forward_weights = vec![1, 1];
        let backward_weights = vec![1, 1];
        let graph = CchGraph {
            upward: &upward,
            forward_weights: &forward_weights,
            backward_weights: &backward_weights,
        };
        let mut search = BiDirectionalDijkstra::new(graph, HeapKind::Binary);
        assert_eq!(search.run(1, 1), 0);
        assert_eq!(search.meeting_node(), 1);
        assert_eq!(search.num_settled_nodes(), 0);
    }
}
