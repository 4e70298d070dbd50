//! Triangle enumeration in the contracted graph.
//!
//! Since the upward graph is chordal and all adjacencies are sorted by head,
//! the triangles containing a given edge can be enumerated by merge walking
//! two neighborhood slices. Downward edges are translated back into upward
//! edge ids, so visitors only ever see canonical contracted edge ids.
//!
//! Triangle terminology for ranks `a < b < c` with edges `ab`, `ac`, `bc`:
//! the lower triangles of `bc` vary `a`, the intermediate triangles of `ac`
//! vary `b` and the upper triangles of `ab` vary `c`. Visitors are called as
//! `f(ab, ac, bc, a, b, c)`.

use super::CchPreprocessor;
use crate::datastr::graph::*;

/// All triangles `(a, b, c)` below the edge `bc`: common lower neighbors
/// `a` of both endpoints, found by merging the downward neighborhoods.
pub fn for_each_lower_triangle(preprocessor: &CchPreprocessor, bc: EdgeId, mut visit: impl FnMut(EdgeId, EdgeId, EdgeId, NodeId, NodeId, NodeId)) {
    let b = preprocessor.upward.tail[bc as usize];
    let c = preprocessor.upward.head[bc as usize];
    let down = &preprocessor.downward;
    let mut b_edge = down.first_out[b as usize] as usize;
    let b_end = down.first_out[b as usize + 1] as usize;
    let mut c_edge = down.first_out[c as usize] as usize;
    let c_end = down.first_out[c as usize + 1] as usize;

    while b_edge < b_end && c_edge < c_end {
        let b_neighbor = down.head[b_edge];
        let c_neighbor = down.head[c_edge];
        if b_neighbor < c_neighbor {
            b_edge += 1;
        } else if c_neighbor < b_neighbor {
            c_edge += 1;
        } else {
            let a = b_neighbor;
            let ab = preprocessor.downward_to_upward[b_edge];
            let ac = preprocessor.downward_to_upward[c_edge];
            visit(ab, ac, bc, a, b, c);
            b_edge += 1;
            c_edge += 1;
        }
    }
}

/// All triangles `(a, b, c)` through the edge `ac`: intermediate nodes `b`
/// with `a < b < c`, found by merging the upward neighborhood of `a` with
/// the downward neighborhood of `c`.
pub fn for_each_intermediate_triangle(preprocessor: &CchPreprocessor, ac: EdgeId, mut visit: impl FnMut(EdgeId, EdgeId, EdgeId, NodeId, NodeId, NodeId)) {
    let a = preprocessor.upward.tail[ac as usize];
    let c = preprocessor.upward.head[ac as usize];
    let up = &preprocessor.upward;
    let down = &preprocessor.downward;
    let mut a_edge = up.first_out[a as usize] as usize;
    let a_end = up.first_out[a as usize + 1] as usize;
    let mut c_edge = down.first_out[c as usize] as usize;
    let c_end = down.first_out[c as usize + 1] as usize;

    while a_edge < a_end && c_edge < c_end {
        let a_neighbor = up.head[a_edge];
        let c_neighbor = down.head[c_edge];
        if a_neighbor < c_neighbor {
            a_edge += 1;
        } else if c_neighbor < a_neighbor {
            c_edge += 1;
        } else {
            let b = a_neighbor;
            if a < b && b < c {
                let ab = a_edge as EdgeId;
                let bc = preprocessor.downward_to_upward[c_edge];
                visit(ab, ac, bc, a, b, c);
            }
            a_edge += 1;
            c_edge += 1;
        }
    }
}

/// All triangles `(a, b, c)` above the edge `ab`: common higher neighbors
/// `c` of both endpoints, found by merging the upward neighborhoods.
pub fn for_each_upper_triangle(preprocessor: &CchPreprocessor, ab: EdgeId, mut visit: impl FnMut(EdgeId, EdgeId, EdgeId, NodeId, NodeId, NodeId)) {
    let a = preprocessor.upward.tail[ab as usize];
    let b = preprocessor.upward.head[ab as usize];
    let up = &preprocessor.upward;
    let mut a_edge = up.first_out[a as usize] as usize;
    let a_end = up.first_out[a as usize + 1] as usize;
    let mut b_edge = up.first_out[b as usize] as usize;
    let b_end = up.first_out[b as usize + 1] as usize;

    while a_edge < a_end && b_edge < b_end {
        let a_neighbor = up.head[a_edge];
        let b_neighbor = up.head[b_edge];
        if a_neighbor < b_neighbor {
            a_edge += 1;
        } else if b_neighbor < a_neighbor {
            b_edge += 1;
        } else {
            let c = a_neighbor;
            let ac = a_edge as EdgeId;
            let bc = b_edge as EdgeId;
            visit(ab, ac, bc, a, b, c);
            a_edge += 1;
            b_edge += 1;
        }
    }
}
