//! Customizable Contraction Hierarchies.
//!
//! The metric independent preprocessing lives here: vertices are renamed into
//! elimination rank space, the input edges are normalized to point upward and the
//! edge set is closed under contraction, yielding a chordal supergraph on which
//! customization and queries operate. The preprocessor additionally maintains the
//! bidirectional mappings between input edges and contracted edges which path
//! unpacking needs to translate results back into input ids.

use crate::datastr::graph::*;
use crate::datastr::heap::HeapKind;
use crate::datastr::id_mapper::IdMapper;
use crate::datastr::node_order::NodeOrder;
use crate::report::*;
use crate::util::filter::*;
use crate::util::permutation::*;

pub mod customization;
pub mod query;
pub mod triangles;

pub use customization::{CchCustomizer, CustomizerState};
pub use query::{CchQuery, QueryState};

/// Metric independent CCH preprocessing state.
///
/// All vertex ids in the contracted graphs are elimination ranks. Edge ids of the
/// upward graph are the canonical contracted edge ids, the downward graph carries
/// a permutation back into that id space.
pub struct CchPreprocessor {
    order: NodeOrder,
    // input endpoints in input ids, one entry per input edge, for path output
    original_tail: Vec<NodeId>,
    original_head: Vec<NodeId>,

    upward: EdgeListGraph,
    downward: EdgeListGraph,
    downward_to_upward: Vec<EdgeId>,

    input_edge_to_cch_edge: Vec<EdgeId>,
    cch_edge_to_input_edge: Vec<EdgeId>,
    is_input_edge_upwards: Filter,

    // unpacking helpers: per contracted edge the input edges collapsing onto it,
    // the common single-edge case inline, parallel edges through a CSR side table
    does_cch_edge_have_input_edge: Filter,
    input_edge_mapper: IdMapper,
    forward_input_edge_of_cch_edge: Vec<EdgeId>,
    backward_input_edge_of_cch_edge: Vec<EdgeId>,
    does_cch_edge_have_extra_input_edge: Filter,
    extra_input_edge_mapper: IdMapper,
    extra_forward_first_edge: Vec<EdgeId>,
    extra_forward_input_edges: Vec<EdgeId>,
    extra_backward_first_edge: Vec<EdgeId>,
    extra_backward_input_edges: Vec<EdgeId>,
}

impl CchPreprocessor {
    /// Preprocess a graph for the given elimination order.
    /// The order has to cover exactly the graph's nodes, the edge list may be unsorted.
    pub fn new(order: NodeOrder, input_graph: EdgeListGraph) -> CchPreprocessor {
        assert_eq!(order.len(), input_graph.num_nodes(), "order and graph node counts differ");
        report_time_with_key("CCH preprocessing", "preprocessing_running_time_ms", || {
            let preprocessor = Self::build(order, input_graph);
            report!("num_nodes", preprocessor.num_nodes());
            report!("num_input_edges", preprocessor.num_input_edges());
            report!("num_cch_edges", preprocessor.num_cch_edges());
            preprocessor
        })
    }

    fn build(order: NodeOrder, input_graph: EdgeListGraph) -> CchPreprocessor {
        let n = order.len();
        let m = input_graph.num_arcs();
        let original_tail = input_graph.tail;
        let original_head = input_graph.head;

        // rename endpoints into rank space and sort the edges by (tail, head),
        // remembering for each sorted slot which input edge it came from
        let mut tail = original_tail.clone();
        let mut head = original_head.clone();
        apply_permutation_to_elements_of(order.ranks(), &mut tail);
        apply_permutation_to_elements_of(order.ranks(), &mut head);
        let mut input_edge_ids = sort_edges_by_tail_then_head(&mut tail, &head);
        head = apply_permutation(&input_edge_ids, &head);

        let upward = Self::build_upward_graph(n, &tail, &head);
        let cch_edge_count = upward.num_arcs();

        // match the sorted input edges against the sorted upward edge list,
        // first in upward orientation, then with tail and head swapped
        let mut is_input_edge_upwards = vec![false; m];
        let mut input_edge_to_cch_edge = vec![INVALID_ID; m];
        if cch_edge_count != 0 {
            let mut cch_edge = 0;
            for edge in 0..m {
                if tail[edge] < head[edge] {
                    while upward.tail[cch_edge] != tail[edge] || upward.head[cch_edge] != head[edge] {
                        cch_edge += 1;
                        assert!(cch_edge < cch_edge_count, "input edge missing from contracted graph");
                    }
                    input_edge_to_cch_edge[input_edge_ids[edge] as usize] = cch_edge as EdgeId;
                    is_input_edge_upwards[input_edge_ids[edge] as usize] = true;
                }
                // self loops keep their INVALID_ID mapping
            }

            std::mem::swap(&mut tail, &mut head);
            let p = sort_edges_by_tail_then_head_inverse(&mut tail, &head);
            head = apply_inverse_permutation(&p, &head);
            input_edge_ids = apply_inverse_permutation(&p, &input_edge_ids);

            let mut cch_edge = 0;
            for edge in 0..m {
                if tail[edge] < head[edge] {
                    while upward.tail[cch_edge] != tail[edge] || upward.head[cch_edge] != head[edge] {
                        cch_edge += 1;
                        assert!(cch_edge < cch_edge_count, "input edge missing from contracted graph");
                    }
                    input_edge_to_cch_edge[input_edge_ids[edge] as usize] = cch_edge as EdgeId;
                }
            }
        }

        let mut cch_edge_to_input_edge = vec![INVALID_ID; cch_edge_count];
        for edge in 0..m {
            if input_edge_to_cch_edge[edge] != INVALID_ID {
                cch_edge_to_input_edge[input_edge_to_cch_edge[edge] as usize] = edge as EdgeId;
            }
        }

        // downward graph: the upward edges turned around and re-sorted, with the
        // sort permutation linking every downward edge back to its upward id
        let mut down_tail = upward.head.clone();
        let down_head = upward.tail.clone();
        let downward_to_upward = sort_edges_by_tail_then_head(&mut down_tail, &down_head);
        let down_head = apply_permutation(&downward_to_upward, &down_head);
        let mut downward = EdgeListGraph::from_edges(n, down_tail, down_head);
        downward.build_first_out();

        // contracted edge -> input edges, split by orientation; the first input edge
        // per direction is stored inline, further parallel edges go to the extra tables
        let mut does_cch_edge_have_input_edge = vec![false; cch_edge_count];
        for edge in 0..m {
            if input_edge_to_cch_edge[edge] != INVALID_ID {
                does_cch_edge_have_input_edge[input_edge_to_cch_edge[edge] as usize] = true;
            }
        }
        let input_edge_mapper = IdMapper::new(&does_cch_edge_have_input_edge);
        let local_count = input_edge_mapper.local_id_count() as usize;
        let mut forward_input_edge_of_cch_edge = vec![INVALID_ID; local_count];
        let mut backward_input_edge_of_cch_edge = vec![INVALID_ID; local_count];
        let mut does_cch_edge_have_extra_input_edge = vec![false; cch_edge_count];
        let mut extra_forward_cch_edges = Vec::new();
        let mut extra_forward_input_edges = Vec::new();
        let mut extra_backward_cch_edges = Vec::new();
        let mut extra_backward_input_edges = Vec::new();

        for edge in 0..m {
            let cch_edge = input_edge_to_cch_edge[edge];
            if cch_edge == INVALID_ID {
                continue;
            }
            let local = input_edge_mapper.to_local(cch_edge) as usize;
            if is_input_edge_upwards[edge] {
                if forward_input_edge_of_cch_edge[local] == INVALID_ID {
                    forward_input_edge_of_cch_edge[local] = edge as EdgeId;
                } else {
                    does_cch_edge_have_extra_input_edge[cch_edge as usize] = true;
                    extra_forward_cch_edges.push(cch_edge);
                    extra_forward_input_edges.push(edge as EdgeId);
                }
            } else if backward_input_edge_of_cch_edge[local] == INVALID_ID {
                backward_input_edge_of_cch_edge[local] = edge as EdgeId;
            } else {
                does_cch_edge_have_extra_input_edge[cch_edge as usize] = true;
                extra_backward_cch_edges.push(cch_edge);
                extra_backward_input_edges.push(edge as EdgeId);
            }
        }

        let extra_input_edge_mapper = IdMapper::new(&does_cch_edge_have_extra_input_edge);
        for cch_edge in extra_forward_cch_edges.iter_mut().chain(extra_backward_cch_edges.iter_mut()) {
            *cch_edge = extra_input_edge_mapper.to_local(*cch_edge);
        }
        let extra_local_count = extra_input_edge_mapper.local_id_count() as usize;
        let (extra_forward_first_edge, extra_forward_input_edges) =
            Self::sort_extra_edges(extra_forward_cch_edges, extra_forward_input_edges, extra_local_count);
        let (extra_backward_first_edge, extra_backward_input_edges) =
            Self::sort_extra_edges(extra_backward_cch_edges, extra_backward_input_edges, extra_local_count);

        CchPreprocessor {
            order,
            original_tail,
            original_head,
            upward,
            downward,
            downward_to_upward,
            input_edge_to_cch_edge,
            cch_edge_to_input_edge,
            is_input_edge_upwards,
            does_cch_edge_have_input_edge,
            input_edge_mapper,
            forward_input_edge_of_cch_edge,
            backward_input_edge_of_cch_edge,
            does_cch_edge_have_extra_input_edge,
            extra_input_edge_mapper,
            extra_forward_first_edge,
            extra_forward_input_edges,
            extra_backward_first_edge,
            extra_backward_input_edges,
        }
    }

    /// Chordal completion through simulated elimination: fold each node's upward
    /// neighborhood into its lowest ranked neighbor, adding exactly the fill in
    /// edges a Gaussian elimination in rank order would create.
    fn build_upward_graph(n: usize, tail: &[NodeId], head: &[NodeId]) -> EdgeListGraph {
        let mut neighbors: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        for (&tail, &head) in tail.iter().zip(head.iter()) {
            if tail != head {
                neighbors[tail.min(head) as usize].push(tail.max(head));
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let mut upward = EdgeListGraph::new(n);
        for node in 0..n {
            if neighbors[node].is_empty() {
                continue;
            }
            let lowest = neighbors[node][0] as usize;
            debug_assert!(lowest > node);
            let (lower, higher) = neighbors.split_at_mut(lowest);
            let list = &lower[node];
            let target = &mut higher[0];

            // sorted merge of the remaining neighbors into the lowest neighbor's list
            let mut merged = Vec::with_capacity(list.len() - 1 + target.len());
            let (mut i, mut j) = (1, 0);
            loop {
                match (list.get(i), target.get(j)) {
                    (Some(&a), Some(&b)) => {
                        merged.push(a.min(b));
                        if a <= b {
                            i += 1;
                        }
                        if b <= a {
                            j += 1;
                        }
                    }
                    (Some(&a), None) => {
                        merged.push(a);
                        i += 1;
                    }
                    (None, Some(&b)) => {
                        merged.push(b);
                        j += 1;
                    }
                    (None, None) => break,
                }
            }
            *target = merged;

            for &neighbor in list {
                upward.add_edge(node as NodeId, neighbor);
            }
        }
        // nodes were processed in ascending order over sorted lists, so the edges are sorted
        upward.build_first_out();
        upward
    }

    fn sort_extra_edges(mut local_ids: Vec<u32>, input_edges: Vec<EdgeId>, local_count: usize) -> (Vec<EdgeId>, Vec<EdgeId>) {
        let p = compute_inverse_stable_sort_permutation(&local_ids);
        local_ids = apply_inverse_permutation(&p, &local_ids);
        let first_edge = construct_adjacency_indices(&local_ids, local_count);
        (first_edge, apply_inverse_permutation(&p, &input_edges))
    }

    pub fn order(&self) -> &NodeOrder {
        &self.order
    }

    pub fn num_nodes(&self) -> usize {
        self.order.len()
    }

    pub fn num_input_edges(&self) -> usize {
        self.original_tail.len()
    }

    pub fn num_cch_edges(&self) -> usize {
        self.upward.num_arcs()
    }

    /// The contracted upward graph. Vertex ids are elimination ranks,
    /// every edge points from lower to higher rank.
    pub fn upward(&self) -> &EdgeListGraph {
        &self.upward
    }

    /// The upward graph with reversed edges, re-sorted by its own tails.
    pub fn downward(&self) -> &EdgeListGraph {
        &self.downward
    }

    /// The upward edge id a downward edge corresponds to.
    pub fn upward_edge_of_downward_edge(&self, downward_edge: EdgeId) -> EdgeId {
        self.downward_to_upward[downward_edge as usize]
    }

    /// The contracted edge an input edge maps onto, `None` for self loops.
    pub fn cch_edge_of_input_edge(&self, input_edge: EdgeId) -> Option<EdgeId> {
        match self.input_edge_to_cch_edge[input_edge as usize] {
            INVALID_ID => None,
            cch_edge => Some(cch_edge),
        }
    }

    /// The first input edge mapping onto `cch_edge` in the given direction,
    /// `INVALID_ID` if the contracted edge is a pure shortcut in that direction.
    fn single_input_edge(&self, cch_edge: EdgeId, forward: bool) -> EdgeId {
        if !self.does_cch_edge_have_input_edge[cch_edge as usize] {
            return INVALID_ID;
        }
        let local = self.input_edge_mapper.to_local(cch_edge) as usize;
        if forward {
            self.forward_input_edge_of_cch_edge[local]
        } else {
            self.backward_input_edge_of_cch_edge[local]
        }
    }

    /// Further parallel input edges mapping onto `cch_edge` in the given direction.
    fn extra_input_edges(&self, cch_edge: EdgeId, forward: bool) -> &[EdgeId] {
        if !self.does_cch_edge_have_extra_input_edge[cch_edge as usize] {
            return &[];
        }
        let local = self.extra_input_edge_mapper.to_local(cch_edge) as usize;
        let (first_edge, input_edges) = if forward {
            (&self.extra_forward_first_edge, &self.extra_forward_input_edges)
        } else {
            (&self.extra_backward_first_edge, &self.extra_backward_input_edges)
        };
        &input_edges[first_edge[local] as usize..first_edge[local + 1] as usize]
    }

    /// Remove the marked contracted edges from both contracted graphs and keep
    /// every mapping table consistent: surviving contracted edge ids shift down
    /// densely, input edges of removed contracted edges become unmapped, and the
    /// per direction input edge tables shrink in lockstep with their id mappers.
    pub fn remove_edges(&mut self, remove_edge_filter: &Filter) {
        assert_eq!(remove_edge_filter.len(), self.num_cch_edges());

        // local removal masks have to be derived before the mappers shrink
        let input_local_filter = self.input_edge_mapper.local_filter(remove_edge_filter);
        let extra_local_filter = self.extra_input_edge_mapper.local_filter(remove_edge_filter);
        let downward_filter: Filter = self
            .downward_to_upward
            .iter()
            .map(|&upward_edge| remove_edge_filter[upward_edge as usize])
            .collect();

        self.upward.remove_edges(remove_edge_filter);
        self.downward.remove_edges(&downward_filter);
        remove_filtered(&mut self.downward_to_upward, &downward_filter);
        adjust_ids_for_removed(&mut self.downward_to_upward, remove_edge_filter);

        remove_filtered(&mut self.cch_edge_to_input_edge, remove_edge_filter);
        remove_filtered(&mut self.does_cch_edge_have_input_edge, remove_edge_filter);
        self.input_edge_mapper.remove(remove_edge_filter);
        remove_filtered(&mut self.forward_input_edge_of_cch_edge, &input_local_filter);
        remove_filtered(&mut self.backward_input_edge_of_cch_edge, &input_local_filter);

        remove_filtered(&mut self.does_cch_edge_have_extra_input_edge, remove_edge_filter);
        self.extra_input_edge_mapper.remove(remove_edge_filter);
        Self::remove_csr_rows(&mut self.extra_forward_first_edge, &mut self.extra_forward_input_edges, &extra_local_filter);
        Self::remove_csr_rows(&mut self.extra_backward_first_edge, &mut self.extra_backward_input_edges, &extra_local_filter);

        adjust_ids_for_removed(&mut self.input_edge_to_cch_edge, remove_edge_filter);
    }

    fn remove_csr_rows(first_edge: &mut Vec<EdgeId>, values: &mut Vec<EdgeId>, removed: &Filter) {
        debug_assert_eq!(first_edge.len(), removed.len() + 1);
        let mut new_first_edge = Vec::with_capacity(first_edge.len());
        let mut new_values = Vec::with_capacity(values.len());
        new_first_edge.push(0);
        for (row, &remove) in removed.iter().enumerate() {
            if !remove {
                new_values.extend_from_slice(&values[first_edge[row] as usize..first_edge[row + 1] as usize]);
                new_first_edge.push(new_values.len() as EdgeId);
            }
        }
        *first_edge = new_first_edge;
        *values = new_values;
    }
}

/// Read only view binding the upward search graph to a pair of customized
/// weight vectors. Lives only as long as the preprocessor and the weights do.
#[derive(Clone, Copy)]
pub struct CchGraph<'a> {
    pub(crate) upward: &'a EdgeListGraph,
    pub(crate) forward_weights: &'a [Weight],
    pub(crate) backward_weights: &'a [Weight],
}

impl<'a> CchGraph<'a> {
    pub fn new(preprocessor: &'a CchPreprocessor, forward_weights: &'a [Weight], backward_weights: &'a [Weight]) -> CchGraph<'a> {
        assert_eq!(forward_weights.len(), preprocessor.num_cch_edges());
        assert_eq!(backward_weights.len(), preprocessor.num_cch_edges());
        CchGraph {
            upward: preprocessor.upward(),
            forward_weights,
            backward_weights,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.upward.num_nodes()
    }
}

/// Owning convenience wrapper tying preprocessor, metric and customized weights
/// together: preprocesses and base customizes on construction, hands out query
/// objects borrowing its state.
pub struct CustomizableContractionHierarchy {
    preprocessor: CchPreprocessor,
    input_weights: Vec<Weight>,
    forward_weights: Vec<Weight>,
    backward_weights: Vec<Weight>,
    state: CustomizerState,
    heap_kind: HeapKind,
}

impl CustomizableContractionHierarchy {
    pub fn new(order: NodeOrder, input_graph: EdgeListGraph, input_weights: Vec<Weight>, heap_kind: HeapKind) -> CustomizableContractionHierarchy {
        assert_eq!(input_graph.num_arcs(), input_weights.len());
        let preprocessor = CchPreprocessor::new(order, input_graph);
        let mut forward_weights = Vec::new();
        let mut backward_weights = Vec::new();
        customization::extract_weights(&preprocessor, &input_weights, &mut forward_weights, &mut backward_weights);
        customization::base_customization(&preprocessor, &mut forward_weights, &mut backward_weights);
        CustomizableContractionHierarchy {
            preprocessor,
            input_weights,
            forward_weights,
            backward_weights,
            state: CustomizerState::BaseCustomized,
            heap_kind,
        }
    }

    /// Drop all shortcuts a witness proves unnecessary, shrinking the contracted graph.
    pub fn customize_perfectly(&mut self) -> &mut Self {
        assert!(self.state >= CustomizerState::BaseCustomized);
        customization::perfect_customization(&mut self.preprocessor, &mut self.forward_weights, &mut self.backward_weights);
        self.state = CustomizerState::PerfectCustomized;
        self
    }

    /// Change the weights of some input edges and re-customize only the affected
    /// part of the hierarchy.
    pub fn update_weights(&mut self, changes: &[(EdgeId, Weight)]) -> &mut Self {
        assert!(self.state >= CustomizerState::BaseCustomized);
        let mut update_ids = Vec::with_capacity(changes.len());
        for &(input_edge, weight) in changes {
            self.input_weights[input_edge as usize] = weight;
            if let Some(cch_edge) = self.preprocessor.cch_edge_of_input_edge(input_edge) {
                update_ids.push(cch_edge);
            }
        }
        update_ids.sort_unstable();
        update_ids.dedup();
        customization::update_edges(
            &self.preprocessor,
            &self.input_weights,
            &mut self.forward_weights,
            &mut self.backward_weights,
            &update_ids,
        );
        self
    }

    /// A fresh query object over the current customized weights.
    pub fn query(&self) -> CchQuery {
        CchQuery::from_parts(
            &self.preprocessor,
            &self.forward_weights,
            &self.backward_weights,
            &self.input_weights,
            self.heap_kind,
        )
    }

    /// One shot shortest distance between two input vertex ids.
    pub fn distance(&self, source: NodeId, target: NodeId) -> Weight {
        let mut query = self.query();
        query.run(source, target)
    }

    pub fn preprocessor(&self) -> &CchPreprocessor {
        &self.preprocessor
    }

    pub fn forward_weights(&self) -> &[Weight] {
        &self.forward_weights
    }

    pub fn backward_weights(&self) -> &[Weight] {
        &self.backward_weights
    }

    pub fn state(&self) -> CustomizerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> EdgeListGraph {
        // six nodes, ten directed edges, already chordal under the identity order
        let tail = vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4];
        let head = vec![1, 2, 0, 2, 3, 4, 4, 5, 3, 5];
        EdgeListGraph::from_edges(6, tail, head)
    }

    #[test]
    fn test_upward_graph_of_chordal_input() {
        let pre = CchPreprocessor::new(NodeOrder::identity(6), sample_graph());
        assert_eq!(pre.num_cch_edges(), 8);
        assert_eq!(pre.upward().tail, vec![0, 0, 1, 2, 2, 3, 3, 4]);
        assert_eq!(pre.upward().head, vec![1, 2, 2, 3, 4, 4, 5, 5]);
    }

    #[test]
    fn test_input_edges_map_to_their_contracted_edges() {
        let pre = CchPreprocessor::new(NodeOrder::identity(6), sample_graph());
        let expected_cch = [0, 1, 0, 2, 3, 4, 5, 6, 5, 7];
        let expected_forward = [true, true, false, true, true, true, true, true, false, true];
        for input_edge in 0..10 {
            assert_eq!(pre.cch_edge_of_input_edge(input_edge), Some(expected_cch[input_edge as usize]));
            assert_eq!(pre.is_input_edge_upwards[input_edge as usize], expected_forward[input_edge as usize]);
            let cch_edge = expected_cch[input_edge as usize];
            assert_eq!(pre.single_input_edge(cch_edge, expected_forward[input_edge as usize]), input_edge);
        }
        // pure shortcuts have no input edge in the missing direction
        assert_eq!(pre.single_input_edge(1, false), INVALID_ID);
        assert_eq!(pre.single_input_edge(6, false), INVALID_ID);
    }

    #[test]
    fn test_fill_in_edges_are_added() {
        // a four cycle needs one fill in edge between the higher neighbors of node 1
        let graph = EdgeListGraph::from_edges(4, vec![0, 1, 2, 3], vec![1, 2, 3, 0]);
        let pre = CchPreprocessor::new(NodeOrder::identity(4), graph);
        assert_eq!(pre.num_cch_edges(), 5);
        assert_eq!(pre.upward().tail, vec![0, 0, 1, 1, 2]);
        assert_eq!(pre.upward().head, vec![1, 3, 2, 3, 3]);
        // the fill in edge (1, 3) maps back to no input edge
        assert_eq!(pre.cch_edge_to_input_edge[3], INVALID_ID);
        assert!(!pre.does_cch_edge_have_input_edge[3]);
    }

    #[test]
    fn test_upward_neighborhoods_form_cliques() {
        // chordality check on a five cycle
        let graph = EdgeListGraph::from_edges(5, vec![0, 1, 2, 3, 4], vec![1, 2, 3, 4, 0]);
        let pre = CchPreprocessor::new(NodeOrder::identity(5), graph);
        let upward = pre.upward();
        for node in 0..5 {
            let neighbors = upward.neighbors(node);
            for (i, &b) in neighbors.iter().enumerate() {
                for &c in &neighbors[i + 1..] {
                    assert!(upward.edge_index(b, c).is_some(), "missing clique edge ({b}, {c})");
                }
            }
        }
    }

    #[test]
    fn test_self_loops_stay_unmapped() {
        let graph = EdgeListGraph::from_edges(3, vec![0, 1, 1], vec![1, 1, 2]);
        let pre = CchPreprocessor::new(NodeOrder::identity(3), graph);
        assert_eq!(pre.num_cch_edges(), 2);
        assert_eq!(pre.cch_edge_of_input_edge(1), None);
        assert_eq!(pre.cch_edge_of_input_edge(0), Some(0));
        assert_eq!(pre.cch_edge_of_input_edge(2), Some(1));
    }

    #[test]
    fn test_downward_graph_mirrors_upward_graph() {
        let pre = CchPreprocessor::new(NodeOrder::identity(6), sample_graph());
        assert_eq!(pre.downward().num_arcs(), pre.num_cch_edges());
        for downward_edge in 0..pre.downward().num_arcs() {
            let upward_edge = pre.upward_edge_of_downward_edge(downward_edge as EdgeId) as usize;
            assert_eq!(pre.downward().tail[downward_edge], pre.upward().head[upward_edge]);
            assert_eq!(pre.downward().head[downward_edge], pre.upward().tail[upward_edge]);
        }
        // downward tails are sorted
        assert!(pre.downward().tail.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_remove_edges_keeps_mappings_consistent() {
        let mut pre = CchPreprocessor::new(NodeOrder::identity(6), sample_graph());
        // remove (1, 2) and (3, 4), which carry inputs 3, 6 and 8
        let mut filter = vec![false; pre.num_cch_edges()];
        filter[2] = true;
        filter[5] = true;
        pre.remove_edges(&filter);

        assert_eq!(pre.num_cch_edges(), 6);
        assert_eq!(pre.upward().tail, vec![0, 0, 2, 2, 3, 4]);
        assert_eq!(pre.upward().head, vec![1, 2, 3, 4, 5, 5]);
        assert_eq!(pre.cch_edge_of_input_edge(3), None);
        assert_eq!(pre.cch_edge_of_input_edge(6), None);
        assert_eq!(pre.cch_edge_of_input_edge(8), None);
        assert_eq!(pre.cch_edge_of_input_edge(0), Some(0));
        assert_eq!(pre.cch_edge_of_input_edge(2), Some(0));
        assert_eq!(pre.cch_edge_of_input_edge(4), Some(2));
        assert_eq!(pre.cch_edge_of_input_edge(9), Some(5));
        assert_eq!(pre.single_input_edge(0, true), 0);
        assert_eq!(pre.single_input_edge(0, false), 2);
        assert_eq!(pre.single_input_edge(5, true), 9);

        assert_eq!(pre.downward().num_arcs(), 6);
        for downward_edge in 0..6 {
            let upward_edge = pre.upward_edge_of_downward_edge(downward_edge) as usize;
            assert_eq!(pre.downward().tail[downward_edge as usize], pre.upward().head[upward_edge]);
            assert_eq!(pre.downward().head[downward_edge as usize], pre.upward().tail[upward_edge]);
        }
    }

    #[test]
    fn test_remove_edges_compacts_parallel_edge_tables() {
        // two contracted edges, each with parallel forward inputs
        let graph = EdgeListGraph::from_edges(3, vec![0, 0, 1, 1], vec![1, 1, 2, 2]);
        let mut pre = CchPreprocessor::new(NodeOrder::identity(3), graph);
        assert_eq!(pre.num_cch_edges(), 2);
        assert_eq!(pre.extra_input_edges(0, true), &[1]);
        assert_eq!(pre.extra_input_edges(1, true), &[3]);

        pre.remove_edges(&vec![true, false]);
        assert_eq!(pre.num_cch_edges(), 1);
        assert_eq!(pre.single_input_edge(0, true), 2);
        assert_eq!(pre.extra_input_edges(0, true), &[3]);
        assert_eq!(pre.cch_edge_of_input_edge(0), None);
        assert_eq!(pre.cch_edge_of_input_edge(1), None);
        assert_eq!(pre.cch_edge_of_input_edge(2), Some(0));
    }

    #[test]
    fn test_facade_customizes_and_answers_queries() {
        let weights = vec![1, 3, 3, 1, 1, 3, 1, 4, 1, 1];
        let cch = CustomizableContractionHierarchy::new(NodeOrder::identity(6), sample_graph(), weights, HeapKind::Binary);
        assert_eq!(cch.state(), CustomizerState::BaseCustomized);
        assert_eq!(cch.distance(0, 5), 5);
        assert_eq!(cch.distance(5, 0), INFINITY);
        assert_eq!(cch.distance(3, 3), 0);
    }

    #[test]
    fn test_facade_update_changes_distances() {
        let weights = vec![1, 3, 3, 1, 1, 3, 1, 4, 1, 1];
        let mut cch = CustomizableContractionHierarchy::new(NodeOrder::identity(6), sample_graph(), weights, HeapKind::Pairing);
        assert_eq!(cch.distance(0, 5), 5);
        // making (2, 3) expensive forces the route over (2, 4)
        cch.update_weights(&[(4, 10)]);
        assert_eq!(cch.distance(0, 5), 6);
        cch.update_weights(&[(4, 1)]);
        assert_eq!(cch.distance(0, 5), 5);
    }
}

