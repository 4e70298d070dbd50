//! Small helpers used across the crate.

pub mod filter;
pub mod in_range_option;
pub mod permutation;

use crate::datastr::graph::*;

/// Add two unsigned values, clamping to the maximum representable value instead of wrapping.
/// Returns the (possibly clamped) sum and whether the addition overflowed.
pub fn saturating_add<T: num_like::UnsignedLike>(a: T, b: T) -> (T, bool) {
    match a.checked_add(b) {
        Some(sum) => (sum, false),
        None => (T::MAX, true),
    }
}

mod num_like {
    /// Minimal abstraction over the unsigned integer types used for weights and ids.
    pub trait UnsignedLike: Copy {
        const MAX: Self;
        fn checked_add(self, other: Self) -> Option<Self>;
    }

    macro_rules! impl_unsigned_like {
        ($($t:ty),*) => {
            $(impl UnsignedLike for $t {
                const MAX: Self = <$t>::MAX;
                fn checked_add(self, other: Self) -> Option<Self> {
                    <$t>::checked_add(self, other)
                }
            })*
        };
    }

    impl_unsigned_like!(u8, u16, u32, u64, usize);
}

/// Add two weights, clamping the result to `INFINITY`.
/// Keeps the invariant that all stored weights are at most `INFINITY`,
/// so linking can never wrap around.
#[inline]
pub fn add_weights(a: Weight, b: Weight) -> Weight {
    std::cmp::min(a.saturating_add(b), INFINITY)
}

/// Find the edge from `x` to `y` by binary search in the sorted neighborhood of `x`.
/// `first_out` and `head` have to form a CSR adjacency structure with sorted neighborhoods.
/// Panics if no such edge exists.
pub fn find_edge_given_sorted_head(first_out: &[EdgeId], head: &[NodeId], x: NodeId, y: NodeId) -> EdgeId {
    let range = (first_out[x as usize] as usize)..(first_out[x as usize + 1] as usize);
    debug_assert!(head[range.clone()].windows(2).all(|w| w[0] <= w[1]));
    let pos = head[range.clone()].binary_search(&y).expect("no edge between the given nodes");
    (range.start + pos) as EdgeId
}

/// Convert a path of node ids into the corresponding path of edge ids.
/// `first_out` and `head` have to form a CSR adjacency structure with sorted neighborhoods.
/// Panics if two consecutive nodes of the path are not connected by an edge.
pub fn node_path_to_edge_path(first_out: &[EdgeId], head: &[NodeId], node_path: &[NodeId]) -> Vec<EdgeId> {
    node_path
        .windows(2)
        .map(|hop| find_edge_given_sorted_head(first_out, head, hop[0], hop[1]))
        .collect()
}

/// Convert a path of edge ids into the corresponding path of node ids.
pub fn edge_path_to_node_path(tail: &[NodeId], head: &[NodeId], edge_path: &[EdgeId]) -> Vec<NodeId> {
    let mut node_path = Vec::with_capacity(edge_path.len() + 1);
    for &edge in edge_path {
        node_path.push(tail[edge as usize]);
    }
    if let Some(&last) = edge_path.last() {
        node_path.push(head[last as usize]);
    }
    node_path
}
