//! Mapping between a global id space and a dense local id space of a subset.

use crate::datastr::graph::*;
use crate::util::filter::*;

/// Maps global ids to dense local ids for the subset marked `true` in a membership filter.
/// Global ids outside the subset map to `INVALID_ID`.
#[derive(Debug, Clone)]
pub struct IdMapper {
    mapping: Vec<u32>,
    local_id_count: u32,
}

impl IdMapper {
    pub fn new(member: &Filter) -> IdMapper {
        let mut mapping = Vec::with_capacity(member.len());
        let mut local_id = 0;
        for &is_member in member {
            if is_member {
                mapping.push(local_id);
                local_id += 1;
            } else {
                mapping.push(INVALID_ID);
            }
        }
        IdMapper {
            mapping,
            local_id_count: local_id,
        }
    }

    /// The local id of a global id, `INVALID_ID` if the global id is not in the subset.
    pub fn to_local(&self, global_id: u32) -> u32 {
        self.mapping[global_id as usize]
    }

    pub fn local_id_count(&self) -> u32 {
        self.local_id_count
    }

    /// Remove the global ids marked `true` from the mapping.
    /// Surviving members are renumbered densely, keeping their relative order,
    /// so any vector indexed by local ids has to be compacted in lockstep
    /// (see `local_filter` for the matching removal mask).
    pub fn remove(&mut self, filter: &Filter) {
        remove_filtered(&mut self.mapping, filter);
        let mut local_id = 0;
        for entry in &mut self.mapping {
            if *entry != INVALID_ID {
                *entry = local_id;
                local_id += 1;
            }
        }
        self.local_id_count = local_id;
    }

    /// Translate a removal mask over global ids into one over local ids.
    /// Has to be called before `remove` with the same filter.
    pub fn local_filter(&self, filter: &Filter) -> Filter {
        assert_eq!(filter.len(), self.mapping.len());
        let mut local = vec![false; self.local_id_count as usize];
        for (&removed, &local_id) in filter.iter().zip(self.mapping.iter()) {
            if removed && local_id != INVALID_ID {
                local[local_id as usize] = true;
            }
        }
        local
    }
}
