//! Shortest path queries on a customized hierarchy.
//!
//! A query maps both endpoints into rank space, runs the bidirectional upward
//! search and translates the result back: the two predecessor chains through
//! the meeting rank form a path of contracted edges, which is unpacked into
//! input edges by replacing every segment that is not witnessed by an input
//! edge with the two legs of the lower triangle that produced its weight.

use super::customization::{CchCustomizer, CustomizerState};
use super::CchPreprocessor;
use crate::algo::bidirectional_dijkstra::BiDirectionalDijkstra;
use crate::algo::cch::CchGraph;
use crate::datastr::graph::*;
use crate::datastr::heap::HeapKind;
use crate::util::{add_weights, edge_path_to_node_path, find_edge_given_sorted_head};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QueryState {
    Uninitialized,
    Initialized,
    Finished,
}

pub struct CchQuery<'a> {
    preprocessor: &'a CchPreprocessor,
    forward_weights: &'a [Weight],
    backward_weights: &'a [Weight],
    input_weights: &'a [Weight],
    search: BiDirectionalDijkstra<'a>,
    state: QueryState,
    source: NodeId,
    target: NodeId,
}

impl<'a> CchQuery<'a> {
    pub fn new(customizer: &'a CchCustomizer<'_>, heap_kind: HeapKind) -> CchQuery<'a> {
        assert!(customizer.state() >= CustomizerState::BaseCustomized, "queries require customized weights");
        Self::from_parts(
            customizer.preprocessor(),
            customizer.forward_weights(),
            customizer.backward_weights(),
            customizer.input_weights(),
            heap_kind,
        )
    }

    pub(crate) fn from_parts(
        preprocessor: &'a CchPreprocessor,
        forward_weights: &'a [Weight],
        backward_weights: &'a [Weight],
        input_weights: &'a [Weight],
        heap_kind: HeapKind,
    ) -> CchQuery<'a> {
        let graph = CchGraph::new(preprocessor, forward_weights, backward_weights);
        CchQuery {
            preprocessor,
            forward_weights,
            backward_weights,
            input_weights,
            search: BiDirectionalDijkstra::new(graph, heap_kind),
            state: QueryState::Uninitialized,
            source: INVALID_ID,
            target: INVALID_ID,
        }
    }

    /// Fix the endpoints of the next query without running it yet.
    pub fn initialize(&mut self, source: NodeId, target: NodeId) -> &mut Self {
        assert!((source as usize) < self.preprocessor.num_nodes());
        assert!((target as usize) < self.preprocessor.num_nodes());
        self.source = source;
        self.target = target;
        self.state = QueryState::Initialized;
        self
    }

    /// Run a query between two input vertex ids. Returns the shortest distance,
    /// `INFINITY` if the target is unreachable.
    pub fn run(&mut self, source: NodeId, target: NodeId) -> Weight {
        self.initialize(source, target);
        self.compute()
    }

    /// Run the query fixed by `initialize`.
    pub fn compute(&mut self) -> Weight {
        assert!(self.state >= QueryState::Initialized, "query endpoints not initialized");
        let order = self.preprocessor.order();
        let distance = self.search.run(order.rank(self.source), order.rank(self.target));
        self.state = QueryState::Finished;
        report_silent!("num_settled_nodes", self.search.num_settled_nodes());
        report_silent!("num_relaxed_edges", self.search.num_relaxed_edges());
        distance
    }

    /// The distance of the most recent query.
    pub fn distance(&self) -> Weight {
        assert!(self.state == QueryState::Finished, "no query has been run");
        self.search.distance()
    }

    pub fn num_settled_nodes(&self) -> u64 {
        self.search.num_settled_nodes()
    }

    pub fn num_relaxed_edges(&self) -> u64 {
        self.search.num_relaxed_edges()
    }

    /// The path of the most recent query as input edge ids, empty if the
    /// target was unreachable or the query was trivial.
    pub fn edge_path(&self) -> Vec<EdgeId> {
        assert!(self.state == QueryState::Finished, "no query has been run");
        if self.search.distance() >= INFINITY || self.source == self.target {
            return Vec::new();
        }

        let order = self.preprocessor.order();
        let source_rank = order.rank(self.source);
        let target_rank = order.rank(self.target);
        let meeting = self.search.meeting_node();

        // contracted segments in travel order, each tagged with its direction
        let mut segments = Vec::new();
        let mut node = meeting;
        while node != source_rank {
            let predecessor = self.search.forward_predecessor(node);
            segments.push((self.upward_edge(predecessor, node), true));
            node = predecessor;
        }
        segments.reverse();
        // the backward chain starts at the meeting rank, so it is already in travel order
        let mut node = meeting;
        while node != target_rank {
            let predecessor = self.search.backward_predecessor(node);
            segments.push((self.upward_edge(predecessor, node), false));
            node = predecessor;
        }

        // unpack depth first, replacing shortcut segments by their triangle legs
        let mut path = Vec::new();
        let mut stack: Vec<(EdgeId, bool)> = segments.into_iter().rev().collect();
        while let Some((edge, forward)) = stack.pop() {
            let weight = if forward {
                self.forward_weights[edge as usize]
            } else {
                self.backward_weights[edge as usize]
            };
            if let Some(input_edge) = self.witnessing_input_edge(edge, forward, weight) {
                path.push(input_edge);
                continue;
            }
            // every segment weight equals the distance of its endpoints, and
            // such weights always decompose through an input edge or a lower
            // triangle whose legs have the same property, even on a perfectly
            // customized graph
            let mut witness = None;
            super::triangles::for_each_lower_triangle(self.preprocessor, edge, |ab, ac, _bc, _a, _b, _c| {
                if witness.is_some() {
                    return;
                }
                let (via, legs) = if forward {
                    // travel b -> a -> c
                    (
                        add_weights(self.backward_weights[ab as usize], self.forward_weights[ac as usize]),
                        [(ac, true), (ab, false)],
                    )
                } else {
                    // travel c -> a -> b
                    (
                        add_weights(self.backward_weights[ac as usize], self.forward_weights[ab as usize]),
                        [(ab, true), (ac, false)],
                    )
                };
                if via == weight {
                    witness = Some(legs);
                }
            });
            match witness {
                Some(legs) => stack.extend_from_slice(&legs),
                None => panic!("contracted edge weight has neither an input edge nor a triangle witness"),
            }
        }
        path
    }

    /// The path of the most recent query as input vertex ids, empty if the
    /// target was unreachable.
    pub fn vertex_path(&self) -> Vec<NodeId> {
        assert!(self.state == QueryState::Finished, "no query has been run");
        if self.source == self.target {
            return vec![self.source];
        }
        if self.search.distance() >= INFINITY {
            return Vec::new();
        }
        let edges = self.edge_path();
        edge_path_to_node_path(&self.preprocessor.original_tail, &self.preprocessor.original_head, &edges)
    }

    fn upward_edge(&self, tail: NodeId, head: NodeId) -> EdgeId {
        let upward = self.preprocessor.upward();
        find_edge_given_sorted_head(&upward.first_out, &upward.head, tail, head)
    }

    /// An input edge mapping onto `edge` whose weight equals the customized
    /// weight, if any. With multiple ties any witness yields a shortest path.
    fn witnessing_input_edge(&self, edge: EdgeId, forward: bool, weight: Weight) -> Option<EdgeId> {
        let direct = self.preprocessor.single_input_edge(edge, forward);
        if direct != INVALID_ID && std::cmp::min(self.input_weights[direct as usize], INFINITY) == weight {
            return Some(direct);
        }
        for &input_edge in self.preprocessor.extra_input_edges(edge, forward) {
            if std::cmp::min(self.input_weights[input_edge as usize], INFINITY) == weight {
                return Some(input_edge);
            }
        }
        None
    }
}
