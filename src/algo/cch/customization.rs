//! Metric customization of a preprocessed hierarchy.
//!
//! Base customization turns extracted input weights into respecting shortcut
//! weights by relaxing every lower triangle in ascending edge order. Perfect
//! customization afterwards propagates distances back down in descending node
//! order and removes every edge a different path witnesses, shrinking the
//! search graph while the survivors keep their base customized weights.
//! Partial updates recompute only the edges reachable from a set of changed
//! ones through the triangle dependency order.

use super::triangles::*;
use super::CchPreprocessor;
use crate::datastr::graph::*;
use crate::datastr::heap::BinaryMinHeap;
use crate::report::*;
use crate::util::add_weights;
use crate::util::filter::remove_filtered;

/// How far a customizer has progressed. The states are ordered, later states
/// imply the guarantees of earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CustomizerState {
    Uncustomized,
    BaseCustomized,
    PerfectCustomized,
}

/// The weight of a contracted edge as induced by the input metric alone:
/// the minimum over all parallel input edges in the given direction,
/// `INFINITY` for pure shortcuts.
pub(crate) fn extracted_weight(preprocessor: &CchPreprocessor, input_weights: &[Weight], cch_edge: EdgeId, forward: bool) -> Weight {
    let mut weight = INFINITY;
    let direct = preprocessor.single_input_edge(cch_edge, forward);
    if direct != INVALID_ID {
        weight = std::cmp::min(input_weights[direct as usize], INFINITY);
    }
    for &input_edge in preprocessor.extra_input_edges(cch_edge, forward) {
        weight = std::cmp::min(weight, std::cmp::min(input_weights[input_edge as usize], INFINITY));
    }
    weight
}

/// Initialize both weight vectors from the input metric.
pub(crate) fn extract_weights(preprocessor: &CchPreprocessor, input_weights: &[Weight], forward_weights: &mut Vec<Weight>, backward_weights: &mut Vec<Weight>) {
    let m = preprocessor.num_cch_edges();
    forward_weights.clear();
    backward_weights.clear();
    forward_weights.reserve(m);
    backward_weights.reserve(m);
    for cch_edge in 0..m as EdgeId {
        forward_weights.push(extracted_weight(preprocessor, input_weights, cch_edge, true));
        backward_weights.push(extracted_weight(preprocessor, input_weights, cch_edge, false));
    }
}

/// Make the weights respect the metric: processing edges in ascending id order,
/// each edge is relaxed with all its lower triangles. Ascending ids are
/// ascending tail ranks, so both legs of every triangle are final when used.
pub(crate) fn base_customization(preprocessor: &CchPreprocessor, forward_weights: &mut [Weight], backward_weights: &mut [Weight]) {
    for bc in 0..preprocessor.num_cch_edges() as EdgeId {
        let mut forward = forward_weights[bc as usize];
        let mut backward = backward_weights[bc as usize];
        for_each_lower_triangle(preprocessor, bc, |ab, ac, _bc, _a, _b, _c| {
            forward = std::cmp::min(forward, add_weights(backward_weights[ab as usize], forward_weights[ac as usize]));
            backward = std::cmp::min(backward, add_weights(backward_weights[ac as usize], forward_weights[ab as usize]));
        });
        forward_weights[bc as usize] = forward;
        backward_weights[bc as usize] = backward;
    }
}

/// Remove every edge whose shortest distance is witnessed by a path through a
/// triangle. Removal requires a strict improvement per direction, so two equal
/// parallel paths cannot witness each other away.
///
/// The downward propagation runs on scratch copies of the weights. Surviving
/// edges keep their base customized weights: a shortest predecessor chain only
/// ever uses edges whose base weight already equals the distance of its
/// endpoints, and exactly those edges are never removed, so both the search
/// and the lower triangle unpacking stay correct on the shrunken graph.
pub(crate) fn perfect_customization(preprocessor: &mut CchPreprocessor, forward_weights: &mut Vec<Weight>, backward_weights: &mut Vec<Weight>) {
    let m = preprocessor.num_cch_edges();
    let mut forward_modified = vec![false; m];
    let mut backward_modified = vec![false; m];
    let mut perfect_forward = forward_weights.clone();
    let mut perfect_backward = backward_weights.clone();

    for node in (0..preprocessor.num_nodes() as NodeId).rev() {
        let edges = preprocessor.upward.neighbor_edge_indices(node);
        for ab in edges {
            for_each_upper_triangle(&*preprocessor, ab, |ab, ac, bc, _a, _b, _c| {
                let (ab, ac, bc) = (ab as usize, ac as usize, bc as usize);

                let via_b = add_weights(perfect_forward[ab], perfect_forward[bc]);
                if via_b < perfect_forward[ac] {
                    perfect_forward[ac] = via_b;
                    forward_modified[ac] = true;
                }
                let via_b = add_weights(perfect_backward[ab], perfect_backward[bc]);
                if via_b < perfect_backward[ac] {
                    perfect_backward[ac] = via_b;
                    backward_modified[ac] = true;
                }
                let via_c = add_weights(perfect_forward[ac], perfect_backward[bc]);
                if via_c < perfect_forward[ab] {
                    perfect_forward[ab] = via_c;
                    forward_modified[ab] = true;
                }
                let via_c = add_weights(perfect_backward[ac], perfect_forward[bc]);
                if via_c < perfect_backward[ab] {
                    perfect_backward[ab] = via_c;
                    backward_modified[ab] = true;
                }
            });
        }
    }

    let remove_filter: Vec<bool> = (0..m)
        .map(|edge| {
            (forward_modified[edge] || perfect_forward[edge] >= INFINITY) && (backward_modified[edge] || perfect_backward[edge] >= INFINITY)
        })
        .collect();
    let num_removed = remove_filter.iter().filter(|&&r| r).count();
    report!("num_removed_cch_edges", num_removed);

    preprocessor.remove_edges(&remove_filter);
    remove_filtered(forward_weights, &remove_filter);
    remove_filtered(backward_weights, &remove_filter);
}

/// Recompute the weights of the given edges and everything depending on them.
///
/// Edges are processed through a priority queue keyed by edge id. Every edge
/// is recomputed from scratch, extraction plus lower triangles, and when its
/// weight changes the edges of the triangles it is a leg of are enqueued.
/// Those always have strictly larger ids, so each edge is settled at most once
/// with final leg weights and the result is identical to a full base
/// customization. Returns the number of edges whose weight actually changed.
pub(crate) fn update_edges(
    preprocessor: &CchPreprocessor,
    input_weights: &[Weight],
    forward_weights: &mut [Weight],
    backward_weights: &mut [Weight],
    update_ids: &[EdgeId],
) -> u64 {
    let mut queue = BinaryMinHeap::new(preprocessor.num_cch_edges());
    for &cch_edge in update_ids {
        queue.insert_or_update(cch_edge, cch_edge);
    }

    let mut num_changed = 0;
    while let Ok(bc) = queue.delete_min() {
        let mut forward = extracted_weight(preprocessor, input_weights, bc, true);
        let mut backward = extracted_weight(preprocessor, input_weights, bc, false);
        for_each_lower_triangle(preprocessor, bc, |ab, ac, _bc, _a, _b, _c| {
            forward = std::cmp::min(forward, add_weights(backward_weights[ab as usize], forward_weights[ac as usize]));
            backward = std::cmp::min(backward, add_weights(backward_weights[ac as usize], forward_weights[ab as usize]));
        });

        if forward == forward_weights[bc as usize] && backward == backward_weights[bc as usize] {
            continue;
        }
        forward_weights[bc as usize] = forward;
        backward_weights[bc as usize] = backward;
        num_changed += 1;

        for_each_upper_triangle(preprocessor, bc, |_ab, _ac, dependent, _a, _b, _c| {
            queue.insert_or_update(dependent, dependent);
        });
        for_each_intermediate_triangle(preprocessor, bc, |_ab, _ac, dependent, _a, _b, _c| {
            queue.insert_or_update(dependent, dependent);
        });
    }
    num_changed
}

/// Customizer borrowing a preprocessed hierarchy and an input metric.
/// Tracks how far customization has progressed, so queries can insist on
/// customized weights.
pub struct CchCustomizer<'a> {
    preprocessor: &'a mut CchPreprocessor,
    input_weights: &'a [Weight],
    forward_weights: Vec<Weight>,
    backward_weights: Vec<Weight>,
    state: CustomizerState,
    num_changed_weights: u64,
}

impl<'a> CchCustomizer<'a> {
    pub fn new(preprocessor: &'a mut CchPreprocessor, input_weights: &'a [Weight]) -> CchCustomizer<'a> {
        assert_eq!(input_weights.len(), preprocessor.num_input_edges());
        let mut forward_weights = Vec::new();
        let mut backward_weights = Vec::new();
        extract_weights(preprocessor, input_weights, &mut forward_weights, &mut backward_weights);
        CchCustomizer {
            preprocessor,
            input_weights,
            forward_weights,
            backward_weights,
            state: CustomizerState::Uncustomized,
            num_changed_weights: 0,
        }
    }

    pub fn base_customization(&mut self) -> &mut Self {
        report_time_with_key("base customization", "base_customization_running_time_ms", || {
            base_customization(self.preprocessor, &mut self.forward_weights, &mut self.backward_weights);
        });
        self.state = CustomizerState::BaseCustomized;
        self
    }

    pub fn perfect_customization(&mut self) -> &mut Self {
        assert!(self.state >= CustomizerState::BaseCustomized, "perfect customization requires base customized weights");
        report_time_with_key("perfect customization", "perfect_customization_running_time_ms", || {
            perfect_customization(self.preprocessor, &mut self.forward_weights, &mut self.backward_weights);
        });
        self.state = CustomizerState::PerfectCustomized;
        self
    }

    /// Swap in a new input metric and re-customize only the given contracted
    /// edges and their dependents.
    pub fn update(&mut self, input_weights: &'a [Weight], update_ids: &[EdgeId]) -> &mut Self {
        assert!(self.state >= CustomizerState::BaseCustomized, "partial updates require base customized weights");
        assert_eq!(input_weights.len(), self.preprocessor.num_input_edges());
        self.input_weights = input_weights;
        self.num_changed_weights = update_edges(
            self.preprocessor,
            self.input_weights,
            &mut self.forward_weights,
            &mut self.backward_weights,
            update_ids,
        );
        self
    }

    /// Throw away all customized weights and start over from a new input metric.
    pub fn reset(&mut self, input_weights: &'a [Weight]) -> &mut Self {
        assert_eq!(input_weights.len(), self.preprocessor.num_input_edges());
        self.input_weights = input_weights;
        extract_weights(self.preprocessor, self.input_weights, &mut self.forward_weights, &mut self.backward_weights);
        self.state = CustomizerState::Uncustomized;
        self.num_changed_weights = 0;
        self
    }

    pub fn preprocessor(&self) -> &CchPreprocessor {
        self.preprocessor
    }

    pub fn input_weights(&self) -> &[Weight] {
        self.input_weights
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

    /// How many contracted edges the most recent `update` call actually changed.
    pub fn num_changed_weights(&self) -> u64 {
        self.num_changed_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastr::node_order::NodeOrder;
    use rand::prelude::*;

    fn sample_graph() -> (EdgeListGraph, Vec<Weight>) {
        // the running example: six nodes, ten directed edges
        let tail = vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4];
        let head = vec![1, 2, 0, 2, 3, 4, 4, 5, 3, 5];
        let weights = vec![1, 3, 3, 1, 1, 3, 1, 4, 1, 1];
        (EdgeListGraph::from_edges(6, tail, head), weights)
    }

    #[test]
    fn test_base_customization_reaches_fixed_point() {
        let (graph, weights) = sample_graph();
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.base_customization();

        // relaxing any lower triangle again must not improve anything
        let preprocessor = customizer.preprocessor();
        for bc in 0..preprocessor.num_cch_edges() as EdgeId {
            for_each_lower_triangle(preprocessor, bc, |ab, ac, bc, _a, _b, _c| {
                let forward = customizer.forward_weights()[bc as usize];
                let backward = customizer.backward_weights()[bc as usize];
                assert!(forward <= add_weights(customizer.backward_weights()[ab as usize], customizer.forward_weights()[ac as usize]));
                assert!(backward <= add_weights(customizer.backward_weights()[ac as usize], customizer.forward_weights()[ab as usize]));
            });
        }
    }

    #[test]
    fn test_perfect_customization_never_increases_weights() {
        let (graph, weights) = sample_graph();
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.base_customization();
        let forward_before = customizer.forward_weights().to_vec();
        let backward_before = customizer.backward_weights().to_vec();
        let tails_before = customizer.preprocessor().upward().tail.clone();
        let heads_before = customizer.preprocessor().upward().head.clone();

        customizer.perfect_customization();
        assert_eq!(customizer.state(), CustomizerState::PerfectCustomized);

        // survivors keep their base customized weights, which in particular
        // never increase
        let preprocessor = customizer.preprocessor();
        for edge in 0..preprocessor.num_cch_edges() {
            let tail = preprocessor.upward().tail[edge];
            let head = preprocessor.upward().head[edge];
            let old = tails_before
                .iter()
                .zip(heads_before.iter())
                .position(|(&t, &h)| t == tail && h == head)
                .unwrap();
            assert_eq!(customizer.forward_weights()[edge], forward_before[old]);
            assert_eq!(customizer.backward_weights()[edge], backward_before[old]);
        }
    }

    #[test]
    fn test_equal_parallel_paths_do_not_remove_each_other() {
        // two vertex disjoint paths of equal length between 0 and 3
        let tail = vec![0, 1, 0, 2];
        let head = vec![1, 3, 2, 3];
        let weights = vec![1, 1, 1, 1];
        let graph = EdgeListGraph::from_edges(4, tail, head);
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(4), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.base_customization();
        customizer.perfect_customization();

        // the distance from 0 to 3 must survive in some edge or triangle path
        let preprocessor = customizer.preprocessor();
        let mut best = INFINITY;
        for edge in 0..preprocessor.num_cch_edges() {
            if preprocessor.upward().tail[edge] == 0 && preprocessor.upward().head[edge] == 3 {
                best = best.min(customizer.forward_weights()[edge]);
            }
        }
        for first in 0..preprocessor.num_cch_edges() {
            if preprocessor.upward().tail[first] != 0 {
                continue;
            }
            let mid = preprocessor.upward().head[first];
            for second in 0..preprocessor.num_cch_edges() {
                if preprocessor.upward().tail[second] == mid && preprocessor.upward().head[second] == 3 {
                    best = best.min(add_weights(customizer.forward_weights()[first], customizer.forward_weights()[second]));
                }
            }
        }
        assert_eq!(best, 2);
    }

    #[test]
    fn test_update_matches_fresh_base_customization() {
        let mut rng = StdRng::seed_from_u64(42);
        let (graph, weights) = sample_graph();
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);

        let mut current_weights = weights.clone();
        let mut customizer = CchCustomizer::new(&mut preprocessor, &current_weights);
        customizer.base_customization();
        let mut forward = customizer.forward_weights().to_vec();
        let mut backward = customizer.backward_weights().to_vec();

        for _ in 0..20 {
            let mut new_weights = current_weights.clone();
            let mut update_ids = Vec::new();
            for _ in 0..rng.gen_range(1..4) {
                let input_edge = rng.gen_range(0..new_weights.len());
                new_weights[input_edge] = rng.gen_range(1..20);
                if let Some(cch_edge) = preprocessor.cch_edge_of_input_edge(input_edge as EdgeId) {
                    update_ids.push(cch_edge);
                }
            }
            update_ids.sort_unstable();
            update_ids.dedup();

            update_edges(&preprocessor, &new_weights, &mut forward, &mut backward, &update_ids);

            let mut fresh_forward = Vec::new();
            let mut fresh_backward = Vec::new();
            extract_weights(&preprocessor, &new_weights, &mut fresh_forward, &mut fresh_backward);
            base_customization(&preprocessor, &mut fresh_forward, &mut fresh_backward);
            assert_eq!(forward, fresh_forward);
            assert_eq!(backward, fresh_backward);

            current_weights = new_weights;
        }
    }

    #[test]
    fn test_reset_restarts_from_extracted_weights() {
        let (graph, weights) = sample_graph();
        let doubled: Vec<Weight> = weights.iter().map(|&w| w * 2).collect();
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.base_customization();
        assert_eq!(customizer.state(), CustomizerState::BaseCustomized);

        customizer.reset(&doubled);
        assert_eq!(customizer.state(), CustomizerState::Uncustomized);
        assert_eq!(customizer.num_changed_weights(), 0);

        let mut fresh_forward = Vec::new();
        let mut fresh_backward = Vec::new();
        extract_weights(customizer.preprocessor(), &doubled, &mut fresh_forward, &mut fresh_backward);
        assert_eq!(customizer.forward_weights(), &fresh_forward[..]);
        assert_eq!(customizer.backward_weights(), &fresh_backward[..]);
    }

    #[test]
    fn test_update_counts_changed_edges() {
        let (graph, weights) = sample_graph();
        let mut changed = weights.clone();
        changed[0] = 5;
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.base_customization();

        let cch_edge = customizer.preprocessor().cch_edge_of_input_edge(0).unwrap();
        customizer.update(&changed, &[cch_edge]);
        assert!(customizer.num_changed_weights() >= 1);
        // the same metric again changes nothing
        customizer.update(&changed, &[cch_edge]);
        assert_eq!(customizer.num_changed_weights(), 0);
    }

    #[test]
    #[should_panic(expected = "partial updates require base customized weights")]
    fn test_update_requires_base_customization() {
        let (graph, weights) = sample_graph();
        let mut preprocessor = CchPreprocessor::new(NodeOrder::identity(6), graph);
        let mut customizer = CchCustomizer::new(&mut preprocessor, &weights);
        customizer.update(&weights, &[0]);
    }

    #[test]
    fn test_extracted_weights_handle_parallel_edges() {
        // three parallel edges from 0 to 1, both orientations mixed
        let tail = vec![0, 1, 0, 0];
        let head = vec![1, 0, 1, 1];
        let weights = vec![5, 7, 3, 9];
        let graph = EdgeListGraph::from_edges(2, tail, head);
        let preprocessor = CchPreprocessor::new(NodeOrder::identity(2), graph);
        assert_eq!(preprocessor.num_cch_edges(), 1);
        assert_eq!(extracted_weight(&preprocessor, &weights, 0, true), 3);
        assert_eq!(extracted_weight(&preprocessor, &weights, 0, false), 7);
    }
}
