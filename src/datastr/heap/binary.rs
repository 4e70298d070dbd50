//! Array-backed binary min-heap with a positions table for decrease-key.

use super::HeapError;
use crate::datastr::graph::*;
use crate::util::in_range_option::InRangeOption;

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: Weight,
    id: NodeId,
}

/// Implicit binary heap over `(key, id)` entries. `positions[id]` tracks the
/// slot of each contained id so decrease-key can find it in O(1).
#[derive(Debug, Clone)]
pub struct BinaryMinHeap {
    data: Vec<Entry>,
    positions: Vec<InRangeOption<u32>>,
}

impl BinaryMinHeap {
    /// Creates a heap for ids in `0..max_id`.
    pub fn new(max_id: usize) -> BinaryMinHeap {
        BinaryMinHeap {
            data: Vec::new(),
            positions: vec![InRangeOption::new(None); max_id],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    pub fn clear(&mut self) {
        for entry in self.data.drain(..) {
            self.positions[entry.id as usize] = InRangeOption::new(None);
        }
    }

    pub fn insert_or_update(&mut self, key: Weight, id: NodeId) {
        debug_assert!((id as usize) < self.positions.len());
        match self.position(id) {
            Some(pos) => {
                if key < self.data[pos].key {
                    self.data[pos].key = key;
                    self.sift_up(pos);
                }
            }
            None => {
                let pos = self.data.len();
                self.data.push(Entry { key, id });
                self.positions[id as usize] = InRangeOption::some(pos as u32);
                self.sift_up(pos);
            }
        }
    }

    pub fn peek(&self) -> Result<Weight, HeapError> {
        self.data.first().map(|entry| entry.key).ok_or(HeapError::Empty)
    }

    pub fn delete_min(&mut self) -> Result<NodeId, HeapError> {
        let last = self.data.len().checked_sub(1).ok_or(HeapError::Empty)?;
        self.swap_entries(0, last);
        let min = self.data.pop().ok_or(HeapError::Empty)?;
        self.positions[min.id as usize] = InRangeOption::new(None);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Ok(min.id)
    }

    pub fn decrease_key(&mut self, id: NodeId, new_key: Weight) -> Result<(), HeapError> {
        let pos = self.position(id).ok_or(HeapError::UnknownId(id))?;
        let current = self.data[pos].key;
        if new_key >= current {
            return Err(HeapError::KeyNotDecreased { current, new: new_key });
        }
        self.data[pos].key = new_key;
        self.sift_up(pos);
        Ok(())
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.positions[id as usize].value().map(|pos| pos as usize)
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        self.positions[self.data[a].id as usize] = InRangeOption::some(a as u32);
        self.positions[self.data[b].id as usize] = InRangeOption::some(b as u32);
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.data[parent].key <= self.data[pos].key {
                break;
            }
            self.swap_entries(parent, pos);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let mut smallest = pos;
            for child in [2 * pos + 1, 2 * pos + 2] {
                if child < self.data.len() && self.data[child].key < self.data[smallest].key {
                    smallest = child;
                }
            }
            if smallest == pos {
                return;
            }
            self.swap_entries(pos, smallest);
            pos = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions_are_consistent(heap: &BinaryMinHeap) -> bool {
        heap.data
            .iter()
            .enumerate()
            .all(|(pos, entry)| heap.position(entry.id) == Some(pos))
    }

    #[test]
    fn test_positions_stay_consistent() {
        let mut heap = BinaryMinHeap::new(16);
        for id in 0..16 {
            heap.insert_or_update(100 - id, id);
            assert!(positions_are_consistent(&heap));
        }
        heap.decrease_key(0, 3).unwrap();
        assert!(positions_are_consistent(&heap));
        while heap.delete_min().is_ok() {
            assert!(positions_are_consistent(&heap));
        }
    }

    #[test]
    fn test_reinsert_after_delete_min() {
        let mut heap = BinaryMinHeap::new(4);
        heap.insert_or_update(1, 0);
        assert_eq!(heap.delete_min(), Ok(0));
        assert!(!heap.contains(0));
        heap.insert_or_update(7, 0);
        assert_eq!(heap.peek(), Ok(7));
        assert_eq!(heap.len(), 1);
    }
}
