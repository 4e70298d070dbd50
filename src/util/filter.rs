//! Boolean membership vectors used as removal masks and subset indicators.

use crate::datastr::graph::*;

/// One bool per element of some indexed collection.
/// `true` marks an element as removed (or as a member, depending on context).
pub type Filter = Vec<bool>;

/// Remove all elements marked `true` in the filter, keeping the relative order of survivors.
pub fn remove_filtered<T>(vec: &mut Vec<T>, filter: &Filter) {
    assert_eq!(vec.len(), filter.len());
    let mut keep = filter.iter();
    vec.retain(|_| !keep.next().unwrap());
}

/// Renumber ids indexing into a space from which the filtered elements were removed.
/// Ids of removed elements become `INVALID_ID`, surviving ids shift down densely.
/// Ids which already were `INVALID_ID` stay invalid.
pub fn adjust_ids_for_removed(ids: &mut [u32], filter: &Filter) {
    // prefix sums of removals, so each surviving id can be shifted in O(1)
    let mut removed_before = Vec::with_capacity(filter.len());
    let mut count = 0u32;
    for &removed in filter {
        removed_before.push(count);
        if removed {
            count += 1;
        }
    }

    for id in ids.iter_mut() {
        if *id == INVALID_ID {
            continue;
        }
        let idx = *id as usize;
        assert!(idx < filter.len());
        *id = if filter[idx] { INVALID_ID } else { *id - removed_before[idx] };
    }
}
