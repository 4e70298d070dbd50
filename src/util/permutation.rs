//! Permutation utilities for reordering edge lists and id spaces.
//!
//! A permutation is a `Vec<u32>` containing each value in `0..len` exactly once.
//! `apply_permutation` gathers (`r[i] = v[p[i]]`), `apply_inverse_permutation`
//! scatters (`r[p[i]] = v[i]`) - most reorderings in the preprocessor are expressed
//! through these two plus stable sort permutations.

use crate::datastr::graph::*;

/// Check that `p` contains every value in `0..p.len()` exactly once.
pub fn is_permutation(p: &[u32]) -> bool {
    let mut seen = vec![false; p.len()];
    for &value in p {
        let Some(entry) = seen.get_mut(value as usize) else {
            return false;
        };
        if *entry {
            return false;
        }
        *entry = true;
    }
    true
}

pub fn identity_permutation(n: usize) -> Vec<u32> {
    (0..n as u32).collect()
}

/// Invert a permutation: `r[p[i]] = i`.
pub fn invert_permutation(p: &[u32]) -> Vec<u32> {
    debug_assert!(is_permutation(p));
    let mut inverse = vec![0; p.len()];
    for (i, &value) in p.iter().enumerate() {
        inverse[value as usize] = i as u32;
    }
    inverse
}

/// Apply a permutation to a vector: `r[i] = v[p[i]]`.
pub fn apply_permutation<T: Copy>(p: &[u32], v: &[T]) -> Vec<T> {
    debug_assert!(is_permutation(p));
    assert_eq!(p.len(), v.len());
    p.iter().map(|&i| v[i as usize]).collect()
}

/// Apply the inverse of a permutation to a vector: `r[p[i]] = v[i]`.
pub fn apply_inverse_permutation<T: Copy + Default>(p: &[u32], v: &[T]) -> Vec<T> {
    debug_assert!(is_permutation(p));
    assert_eq!(p.len(), v.len());
    let mut result = vec![Default::default(); v.len()];
    for (&pos, &value) in p.iter().zip(v.iter()) {
        result[pos as usize] = value;
    }
    result
}

/// Apply a permutation to the elements of a vector: `r[i] = p[v[i]]`.
/// Used to rename node ids through a rank mapping.
pub fn apply_permutation_to_elements_of(p: &[u32], v: &mut [u32]) {
    debug_assert!(is_permutation(p));
    debug_assert!(v.iter().all(|&x| (x as usize) < p.len()), "out of bounds element");
    for value in v.iter_mut() {
        *value = p[*value as usize];
    }
}

/// Chain two permutations into `r[i] = p[q[i]]`.
pub fn chain_permutation(p: &[u32], q: &[u32]) -> Vec<u32> {
    debug_assert!(is_permutation(p));
    debug_assert!(is_permutation(q));
    assert_eq!(p.len(), q.len());
    q.iter().map(|&i| p[i as usize]).collect()
}

/// Compute the permutation which stably sorts `v` ascending: `v[r[0]] <= v[r[1]] <= ...`
pub fn compute_stable_sort_permutation<T: Ord>(v: &[T]) -> Vec<u32> {
    let mut p = identity_permutation(v.len());
    p.sort_by_key(|&i| &v[i as usize]);
    p
}

/// The inverse of `compute_stable_sort_permutation`: `r[i]` is the position
/// element `i` ends up at after the stable sort.
pub fn compute_inverse_stable_sort_permutation<T: Ord>(v: &[T]) -> Vec<u32> {
    invert_permutation(&compute_stable_sort_permutation(v))
}

/// Stably sort the edges given as parallel `tail`/`head` arrays by `(tail, head)`.
/// `tail` is sorted in place, the returned permutation has to be applied (via
/// `apply_permutation`) to `head` and any other edge-indexed vector by the caller.
pub fn sort_edges_by_tail_then_head(tail: &mut Vec<NodeId>, head: &[NodeId]) -> Vec<EdgeId> {
    assert_eq!(tail.len(), head.len());
    let mut p = identity_permutation(tail.len());
    p.sort_by_key(|&e| (tail[e as usize], head[e as usize]));
    *tail = apply_permutation(&p, tail);
    debug_assert!(tail.windows(2).all(|w| w[0] <= w[1]));
    p
}

/// Like `sort_edges_by_tail_then_head` but returns the inverse permutation,
/// for call sites which scatter via `apply_inverse_permutation`.
pub fn sort_edges_by_tail_then_head_inverse(tail: &mut Vec<NodeId>, head: &[NodeId]) -> Vec<EdgeId> {
    invert_permutation(&sort_edges_by_tail_then_head(tail, head))
}

/// Build CSR offsets over a sorted id vector: `r[id]..r[id + 1]` is the range
/// of positions in `sorted_ids` holding `id`. `r` has `id_count + 1` entries.
pub fn construct_adjacency_indices(sorted_ids: &[u32], id_count: usize) -> Vec<u32> {
    debug_assert!(sorted_ids.windows(2).all(|w| w[0] <= w[1]));
    debug_assert!(sorted_ids.iter().all(|&id| (id as usize) < id_count));
    let mut offsets = vec![0; id_count + 1];
    for &id in sorted_ids {
        offsets[id as usize + 1] += 1;
    }
    for i in 0..id_count {
        offsets[i + 1] += offsets[i];
    }
    offsets
}
